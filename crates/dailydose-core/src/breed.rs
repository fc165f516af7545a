//! Breed label derivation for dog image URLs.
//!
//! The dog API encodes the breed in the image path, sub-breed first:
//! `https://images.dog.ceo/breeds/hound-afghan/n123.jpg` is an Afghan Hound.
//! The label is cosmetic, so anything unexpected falls back to
//! [`RANDOM_DOG`] instead of failing.

use crate::models::RANDOM_DOG;

const BREEDS_MARKER: &str = "/breeds/";

/// Derives a display label such as `"Afghan Hound"` from an image URL.
///
/// # Examples
///
/// ```
/// use dailydose_core::breed::derive_breed_label;
///
/// assert_eq!(
///     derive_breed_label("https://images.dog.ceo/breeds/hound-afghan/n123.jpg"),
///     "Afghan Hound"
/// );
/// assert_eq!(derive_breed_label("https://example.com/dog.jpg"), "Random Dog");
/// ```
pub fn derive_breed_label(image_url: &str) -> String {
    let Some((_, rest)) = image_url.split_once(BREEDS_MARKER) else {
        return RANDOM_DOG.to_string();
    };

    let segment = rest.split('/').next().unwrap_or_default();
    let words: Vec<String> = segment
        .split('-')
        .rev()
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        RANDOM_DOG.to_string()
    } else {
        words.join(" ")
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
