/// yWriter bracket markup to ODT conversion.
///
/// This module encodes the inline markup yWriter stores in scene text
/// (`[i]`, `[b]`, `[lang=xx]` and `/* comments */`) as ODT paragraph XML
/// ready to be placed in a document's `office:text`.
///
/// Formatting that runs across line breaks is balanced first, so every
/// paragraph carries its own properly nested spans.
///
/// # Examples
///
/// ```rust
/// use ywodt::markup::{EncoderOptions, encode};
///
/// let options = EncoderOptions::new()
///     .with_languages(["fr"])
///     .with_author("Jane Roe");
///
/// let xml = encode("[i]Il pleut.\nEncore.[/i] /* check */", &options);
/// assert_eq!(xml.matches("<text:p ").count(), 2);
/// ```
pub mod balance;
pub mod config;
pub mod encoder;

pub use balance::{BracketTag, MarkupRun, TagState, balance, balance_lines, recognized_tags};
pub use config::EncoderOptions;
pub use encoder::{ToOdtXml, encode};
