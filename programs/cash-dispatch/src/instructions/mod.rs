#![allow(ambiguous_glob_reexports)]

pub mod cancel;
pub mod claim;
pub mod close;
pub mod distribute;
pub mod expand_distribution_tree;
pub mod initialize;
pub mod pause_resume;
pub mod reclaim;

pub use cancel::*;
pub use claim::*;
pub use close::*;
pub use distribute::*;
pub use expand_distribution_tree::*;
pub use initialize::*;
pub use pause_resume::*;
pub use reclaim::*;
