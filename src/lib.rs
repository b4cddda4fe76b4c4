//! Reformat TAL effector binding element (EBE) predictions into
//! gene-by-TALE tables.
//!
//! Takes the tab-delimited output of TALVEZ, TALgetter, or TALENT and
//! produces a unified value matrix (one row per predicted binding site, one
//! column per TALE), a per-gene table of binding-site positions, and per-TALE
//! FASTA exports of the predicted sequences.

pub mod aggregate;
pub mod error;
pub mod input;
pub mod keyspace;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod utils;
