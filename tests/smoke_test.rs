mod common;

use common::TestEnv;
use profit_ledger::{domain::EntryDraft, init};

#[test]
fn ledger_lifecycle_smoke() {
    init();

    let env = TestEnv::new();
    let mut manager = env.open();
    let entry = manager
        .add(&EntryDraft::new("2023-12-15", 10_000.0, 500.0, 2_000.0))
        .unwrap();
    assert_eq!(entry.profit, -1_500.0);
    assert_eq!(manager.ledger().get(0), Some(&entry));

    let snapshot = manager.shutdown();
    assert_eq!(snapshot.total_entries, 1);
    assert_eq!(snapshot.version, "1.0");
}
