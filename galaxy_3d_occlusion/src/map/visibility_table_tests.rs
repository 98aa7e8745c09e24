use super::*;
use crate::error::Error;

#[test]
fn test_explicit_rows_are_directed() {
    let table = ExplicitVisibilityTable::new(vec![vec![0, 1], vec![1]]).unwrap();
    assert_eq!(table.num_clusters(), 2);
    assert!(table.pvs_row(0).unwrap().contains(&1));
    assert!(!table.pvs_row(1).unwrap().contains(&0));
}

#[test]
fn test_explicit_rejects_unknown_ids() {
    assert_eq!(
        ExplicitVisibilityTable::new(vec![vec![0, 2], vec![]]).err(),
        Some(Error::InvalidCluster(2))
    );
    assert!(ExplicitVisibilityTable::new(vec![vec![-1]]).is_err());
}

#[test]
fn test_explicit_out_of_range_lookup() {
    let table = ExplicitVisibilityTable::new(vec![vec![0]]).unwrap();
    assert_eq!(table.pvs_row(1), Err(Error::InvalidCluster(1)));
    assert_eq!(table.pvs_row(-1), Err(Error::InvalidCluster(-1)));
}

#[test]
fn test_all_visible() {
    let table = ExplicitVisibilityTable::all_visible(3);
    for cluster in 0..3 {
        assert_eq!(table.pvs_row(cluster).unwrap().len(), 3);
    }
}
