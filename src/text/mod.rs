// Text processing — comment cleaning and stopwords.

pub mod normalize;
pub mod stopwords;

pub use normalize::clean_text;
