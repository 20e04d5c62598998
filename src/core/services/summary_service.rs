use crate::domain::{Aggregates, Ledger};

pub struct SummaryService;

impl SummaryService {
    /// Full rescan of the ledger. Called after every mutation; nothing is cached.
    pub fn aggregates(ledger: &Ledger) -> Aggregates {
        let mut totals = ledger.iter().fold(Aggregates::default(), |mut acc, entry| {
            acc.total_revenue += entry.revenue;
            acc.total_commission += entry.commission;
            acc.total_expenses += entry.expenses;
            acc
        });
        totals.net_profit = totals.total_commission - totals.total_expenses;
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;

    fn entry(revenue: f64, commission: f64, expenses: f64, id: i64) -> Entry {
        Entry {
            date: "2023-12-15".into(),
            revenue,
            commission,
            expenses,
            profit: commission - expenses,
            timestamp: "2023-12-15T10:30:00.000Z".into(),
            id,
        }
    }

    #[test]
    fn aggregates_sum_the_whole_ledger() {
        let ledger = Ledger::from_entries(vec![
            entry(10_000.0, 500.0, 2_000.0, 1),
            entry(8_000.0, 400.0, 1_500.0, 2),
        ]);
        let totals = SummaryService::aggregates(&ledger);
        assert_eq!(totals.total_revenue, 18_000.0);
        assert_eq!(totals.total_commission, 900.0);
        assert_eq!(totals.total_expenses, 3_500.0);
        assert_eq!(totals.net_profit, -2_600.0);
    }

    #[test]
    fn net_profit_ignores_stored_profit_values() {
        let mut tampered = entry(0.0, 100.0, 40.0, 1);
        tampered.profit = 1_000_000.0;
        let totals = SummaryService::aggregates(&Ledger::from_entries(vec![tampered]));
        assert_eq!(totals.net_profit, 60.0);
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        assert_eq!(
            SummaryService::aggregates(&Ledger::new()),
            Aggregates::default()
        );
    }
}
