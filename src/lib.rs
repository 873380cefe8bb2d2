// ShortSafe: toxicity screening for short-video titles and captions
//
// This is the library root. Each module corresponds to one stage of the
// screening pipeline: static lexicon, detection (remote classifier plus
// heuristic fallback), and the publication gate that acts on the result.

pub mod config;
pub mod detection;
pub mod gate;
pub mod lexicon;
pub mod output;

#[cfg(feature = "web")]
pub mod web;
