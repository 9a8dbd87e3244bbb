use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

use docqa_core::config::IndexSettings;

/// Common English function words, removed only when `IndexSettings::stop_words` is set.
pub const STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
];

/// Tokenization shared by index build and query scoring.
///
/// Policy: split on every non-alphanumeric character (Unicode aware), lower-case
/// each token, drop empty tokens. No stemming. Stop words are kept unless the
/// settings ask for removal. The same text always yields the same tokens.
#[derive(Clone)]
pub struct Analyzer {
	inner: TextAnalyzer,
}

impl Analyzer {
	pub fn new(settings: &IndexSettings) -> Self {
		let builder = TextAnalyzer::builder(SimpleTokenizer::default()).filter(LowerCaser);
		let inner = if settings.stop_words {
			builder.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string()))).build()
		} else {
			builder.build()
		};
		Self { inner }
	}

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		// token_stream needs &mut; a clone keeps the analyzer shareable across threads
		let mut analyzer = self.inner.clone();
		let mut stream = analyzer.token_stream(text);
		let mut tokens = Vec::new();
		while stream.advance() {
			let token = &stream.token().text;
			if !token.is_empty() { tokens.push(token.clone()); }
		}
		tokens
	}
}

impl Default for Analyzer {
	fn default() -> Self { Self::new(&IndexSettings::default()) }
}

impl std::fmt::Debug for Analyzer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Analyzer").finish_non_exhaustive()
	}
}
