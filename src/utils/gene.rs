//! Gene symbol derivation from predictor sequence IDs.

/// Suffix markers separating a gene locus name from transcript/variant
/// qualifiers in sequence IDs (e.g. "geneA.g2.c3" names locus "geneA").
/// Applied in this fixed order, each to the result of the previous cut.
const GENE_SUFFIX_MARKERS: [&str; 4] = [".r", ".g", ".c", ".i"];

/// Derive the gene symbol that groups a sequence ID's binding sites,
/// truncating at the first occurrence of each suffix marker.
pub fn gene_symbol(seq_id: &str) -> String {
    let mut gene = seq_id;
    for marker in GENE_SUFFIX_MARKERS {
        if let Some(idx) = gene.find(marker) {
            gene = &gene[..idx];
        }
    }
    gene.to_string()
}
