use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;

use crate::code::unique_code;
use crate::error::{KasboekError, Result};
use crate::models::Transaction;

/// Parser for one row of a Rabobank CSV export.
///
/// The column layout is fixed by the bank and not configurable. A parsed
/// transaction carries its dedup code but no owner yet; the import pipeline
/// attaches the user before validation.
pub struct RabobankRowParser;

impl RabobankRowParser {
    const TO_ACCOUNT_NUMBER: usize = 0;
    const DATE: usize = 4;
    const AMOUNT: usize = 6;
    const PAYEE: usize = 9;
    const INCASSO_REFERENCE: usize = 16;
    const MEMO: usize = 19;

    /// Minimum number of columns a row must have.
    pub const MIN_COLUMNS: usize = Self::MEMO + 1;

    pub fn parse(&self, record: &StringRecord) -> Result<Transaction> {
        let date_str = self.field(record, Self::DATE)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| KasboekError::MalformedRow(format!("unparseable date '{date_str}'")))?;

        let (inflow, outflow) = self.parse_amount(self.field(record, Self::AMOUNT)?)?;

        let mut transaction = Transaction {
            id: None,
            code: String::new(),
            date,
            to_account_number: self.field(record, Self::TO_ACCOUNT_NUMBER)?.to_string(),
            payee: self.field(record, Self::PAYEE)?.to_string(),
            memo: self.parse_memo(
                self.field(record, Self::MEMO)?,
                self.field(record, Self::INCASSO_REFERENCE)?,
            ),
            inflow,
            outflow,
            user_id: None,
            category_id: None,
        };
        transaction.code = unique_code(&transaction);
        Ok(transaction)
    }

    fn field<'a>(&self, record: &'a StringRecord, index: usize) -> Result<&'a str> {
        record.get(index).ok_or_else(|| {
            KasboekError::MalformedRow(format!(
                "row has {} columns, at least {} required",
                record.len(),
                Self::MIN_COLUMNS
            ))
        })
    }

    /// The amount column is a signed decimal with `,` as decimal separator,
    /// e.g. `+2,50` or `-1868,12`. The sign decides which flow is populated.
    fn parse_amount(&self, raw: &str) -> Result<(Option<Decimal>, Option<Decimal>)> {
        let normalized = raw.replace(',', ".");
        let mut chars = normalized.chars();
        let sign = chars
            .next()
            .ok_or_else(|| KasboekError::InvalidAmount("empty amount field".to_string()))?;
        let amount: Decimal = chars
            .as_str()
            .parse()
            .map_err(|_| KasboekError::InvalidAmount(format!("unparseable amount '{raw}'")))?;

        match sign {
            '+' => Ok((Some(amount), None)),
            '-' => Ok((None, Some(amount))),
            _ => Err(KasboekError::InvalidAmount(format!(
                "amount '{raw}' has no leading sign"
            ))),
        }
    }

    fn parse_memo(&self, memo: &str, incasso_reference: &str) -> String {
        if incasso_reference.trim().is_empty() {
            memo.to_string()
        } else {
            format!("{memo} (Incasso: {incasso_reference})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // A full Rabobank export row has 26 columns.
    fn rabobank_row(amount: &str, payee: &str, incasso: &str, memo: &str) -> StringRecord {
        let mut fields = vec![""; 26];
        fields[0] = "NL11RABO0104955555";
        fields[1] = "EUR";
        fields[2] = "RABONL2U";
        fields[3] = "000000000000007213";
        fields[4] = "2019-09-01";
        fields[5] = "2019-09-01";
        fields[6] = amount;
        fields[7] = "+1868,12";
        fields[8] = "NL42RABO0114164838";
        fields[9] = payee;
        fields[12] = "RABONL2U";
        fields[13] = "cb";
        fields[16] = incasso;
        fields[19] = memo;
        fields[20] = " ";
        StringRecord::from(fields)
    }

    #[test]
    fn test_parses_inflow_transaction() {
        let row = rabobank_row("+2,50", "J.M.G. Kerkhoffs eo", "", "Spotify");
        let txn = RabobankRowParser.parse(&row).unwrap();

        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2019, 9, 1).unwrap());
        assert_eq!(txn.to_account_number, "NL11RABO0104955555");
        assert_eq!(txn.payee, "J.M.G. Kerkhoffs eo");
        assert_eq!(txn.memo, "Spotify");
        assert_eq!(txn.inflow, Some(dec("2.50")));
        assert_eq!(txn.outflow, None);
        assert!(txn.user_id.is_none());
    }

    #[test]
    fn test_parses_outflow_transaction() {
        let row = rabobank_row("-2,50", "J.M.G. Kerkhoffs eo", "", "Spotify");
        let txn = RabobankRowParser.parse(&row).unwrap();

        assert_eq!(txn.inflow, None);
        assert_eq!(txn.outflow, Some(dec("2.50")));
    }

    #[test]
    fn test_assigns_unique_code_based_on_row_values() {
        let row = rabobank_row("+2,50", "J.M.G. Kerkhoffs eo", "", "Spotify");
        let first = RabobankRowParser.parse(&row).unwrap();
        let second = RabobankRowParser.parse(&row).unwrap();
        assert_eq!(first.code, second.code);
        assert_eq!(first.code.len(), 32);

        let other_row = rabobank_row("+2,50", "Lidl 176 Sittard Ind SITTARD", "", "Spotify");
        let other = RabobankRowParser.parse(&other_row).unwrap();
        assert_ne!(first.code, other.code);
    }

    #[test]
    fn test_incasso_reference_gets_appended_to_memo() {
        let row = rabobank_row("-2,50", "J.M.G. Kerkhoffs eo", "abc-def-ghi", "Sport abo");
        let txn = RabobankRowParser.parse(&row).unwrap();
        assert_eq!(txn.memo, "Sport abo (Incasso: abc-def-ghi)");
    }

    #[test]
    fn test_blank_incasso_reference_leaves_memo_unchanged() {
        let row = rabobank_row("-2,50", "J.M.G. Kerkhoffs eo", "  ", "Sport abo");
        let txn = RabobankRowParser.parse(&row).unwrap();
        assert_eq!(txn.memo, "Sport abo");
    }

    #[test]
    fn test_fails_on_short_row() {
        let row = StringRecord::from(vec!["0", "0", "0", "0", ""]);
        let err = RabobankRowParser.parse(&row).unwrap_err();
        assert!(matches!(err, KasboekError::MalformedRow(_)));
    }

    #[test]
    fn test_fails_on_unparseable_date() {
        let mut fields: Vec<String> = rabobank_row("+2,50", "timo", "", "memo")
            .iter()
            .map(String::from)
            .collect();
        fields[4] = "01-09-2019".to_string();
        let row = StringRecord::from(fields);
        let err = RabobankRowParser.parse(&row).unwrap_err();
        assert!(matches!(err, KasboekError::MalformedRow(_)));
    }

    #[test]
    fn test_fails_on_unsigned_amount() {
        let row = rabobank_row("2,50", "timo", "", "memo");
        let err = RabobankRowParser.parse(&row).unwrap_err();
        assert!(matches!(err, KasboekError::InvalidAmount(_)));
    }

    #[test]
    fn test_fails_on_non_numeric_amount() {
        let row = rabobank_row("+tien", "timo", "", "memo");
        let err = RabobankRowParser.parse(&row).unwrap_err();
        assert!(matches!(err, KasboekError::InvalidAmount(_)));
    }
}
