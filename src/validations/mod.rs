pub mod close_nodes;
pub mod issue;

pub use close_nodes::CloseNodes;
pub use issue::{Fix, FixAction, Issue, IssueSubtype, Severity};
