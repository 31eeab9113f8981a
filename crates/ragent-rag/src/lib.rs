pub mod department;
pub mod http;
pub mod merge;
pub mod mock;
pub mod prompts;
pub mod retriever;
pub mod rewriter;

pub use department::{detect_department, Department};
pub use http::HttpRetriever;
pub use merge::{citations, merge_documents, MAX_MERGED_RESULTS};
pub use mock::StaticRetriever;
pub use retriever::{Domain, Retriever, SearchRequest};
pub use rewriter::{fold_accents, is_conversational, QueryRewriter, RewriterConfig};
