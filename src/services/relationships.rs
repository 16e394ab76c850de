//! Known amendment relationships between regulations.
//!
//! Grounded on the prototype's `insert_relationships`: a short hand-curated
//! list of FRBR URI pairs for amendments the crawler's own detail-page
//! metadata doesn't carry a machine-readable signal for. `relationship_type`
//! codes here use the English pair the schema seeds (`amends`/`amended_by`)
//! rather than the prototype's Indonesian `mengubah`/`diubah_oleh` codes.
//! `Store::seed_relationships` is idempotent: it skips pairs whose works
//! aren't loaded yet and skips rows that already exist.

use crate::models::WorkRelationship;
use crate::repository::Store;

/// (amending FRBR URI, amended FRBR URI) pairs known ahead of time.
static KNOWN_AMENDMENTS: &[(&str, &str)] = &[
    // Cipta Kerja amends the Labor Law
    ("/akn/id/act/uu/2023/6", "/akn/id/act/uu/2003/13"),
    // Marriage age amendment
    ("/akn/id/act/uu/2019/16", "/akn/id/act/uu/1974/1"),
    // Anti-corruption amendment
    ("/akn/id/act/uu/2001/20", "/akn/id/act/uu/1999/31"),
    // Legislative drafting amendment
    ("/akn/id/act/uu/2022/13", "/akn/id/act/uu/2011/12"),
    // Second ITE amendment
    ("/akn/id/act/uu/2024/27", "/akn/id/act/uu/2016/19"),
];

fn known_relationships() -> Vec<WorkRelationship> {
    KNOWN_AMENDMENTS
        .iter()
        .flat_map(|(amending, amended)| {
            [
                WorkRelationship {
                    source_frbr_uri: amending.to_string(),
                    target_frbr_uri: amended.to_string(),
                    relationship_type: "amends".to_string(),
                },
                WorkRelationship {
                    source_frbr_uri: amended.to_string(),
                    target_frbr_uri: amending.to_string(),
                    relationship_type: "amended_by".to_string(),
                },
            ]
        })
        .collect()
}

/// Seeds whichever of the known amendment pairs already have both works
/// loaded. Safe to call repeatedly; returns the number of rows inserted
/// this call.
pub async fn seed_known_relationships(store: &Store) -> anyhow::Result<u64> {
    Ok(store.seed_relationships(&known_relationships()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_relationships_are_mirrored_pairs() {
        let rels = known_relationships();
        assert_eq!(rels.len(), KNOWN_AMENDMENTS.len() * 2);
        assert!(rels.iter().any(|r| r.relationship_type == "amends"));
        assert!(rels.iter().any(|r| r.relationship_type == "amended_by"));
    }

    #[test]
    fn every_amends_row_has_a_matching_amended_by_row() {
        let rels = known_relationships();
        for r in rels.iter().filter(|r| r.relationship_type == "amends") {
            assert!(rels.iter().any(|other| {
                other.relationship_type == "amended_by"
                    && other.source_frbr_uri == r.target_frbr_uri
                    && other.target_frbr_uri == r.source_frbr_uri
            }));
        }
    }
}
