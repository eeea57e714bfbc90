mod extractor;

pub use extractor::LinkareerExtractor;
