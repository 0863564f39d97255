//! CSV format handling for command logs and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to commands
//! - Transaction and party report serialization
//!
//! # Input columns
//!
//! `op,tx,caller,now,value,quantity,duration,text`. Which of the optional
//! columns an operation reads:
//!
//! | op | value | quantity | duration | text |
//! |---|---|---|---|---|
//! | create | price | quantity | duration | book |
//! | add_funds | amount | | | |
//! | resolve_dispute | | | | `customer` or `store` |
//! | release_payment | | | | review |
//! | rate | rating | | | |
//! | update_book | | | | book |
//! | update_price | price | | | |
//! | update_quantity | | quantity | | |
//! | update_deadline | deadline | | | |
//! | update_status | | | | status |

use crate::cli::ReportType;
use crate::core::LedgerSnapshot;
use crate::types::{
    Action, BookId, EscrowCommand, EscrowError, PartyBalance, PartyId, Resolution, Timestamp,
    TransactionId, TransactionRecord,
};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Operand columns are optional strings so that empty cells and unparsable
/// numbers can be reported per field.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub tx: TransactionId,
    pub caller: String,
    pub now: Timestamp,
    pub value: Option<String>,
    pub quantity: Option<String>,
    pub duration: Option<String>,
    pub text: Option<String>,
}

/// Non-empty trimmed cell contents
fn cell(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required_text(
    raw: &Option<String>,
    op: &str,
    field: &str,
    tx: TransactionId,
) -> Result<String, EscrowError> {
    cell(raw)
        .map(str::to_string)
        .ok_or_else(|| EscrowError::missing_field(op, field, tx))
}

fn required_number<T: std::str::FromStr>(
    raw: &Option<String>,
    op: &str,
    field: &str,
    tx: TransactionId,
) -> Result<T, EscrowError> {
    let value = cell(raw)
        .ok_or_else(|| EscrowError::missing_field(op, field, tx))?;
    value
        .parse::<T>()
        .map_err(|_| EscrowError::invalid_field(field, value, tx))
}

fn parse_resolution(raw: &str, tx: TransactionId) -> Result<Resolution, EscrowError> {
    match raw.to_lowercase().as_str() {
        "customer" => Ok(Resolution::InFavorOfCustomer),
        "store" => Ok(Resolution::InFavorOfStore),
        _ => Err(EscrowError::invalid_field("resolution", raw, tx)),
    }
}

/// Convert a CsvRecord to an EscrowCommand
///
/// The operation name is matched case-insensitively. Columns an operation does
/// not read are ignored.
///
/// # Errors
///
/// - `InvalidCommandType` for an unknown operation
/// - `MissingField` when a required column is empty
/// - `InvalidField` when a column cannot be parsed
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<EscrowCommand, EscrowError> {
    let tx = csv_record.tx;
    let op = csv_record.op.to_lowercase();
    let caller = csv_record.caller.trim();
    if caller.is_empty() {
        return Err(EscrowError::missing_field(&op, "caller", tx));
    }

    let action = match op.as_str() {
        "create" => Action::Create {
            book: BookId::new(required_text(&csv_record.text, &op, "book", tx)?),
            quantity: required_number(&csv_record.quantity, &op, "quantity", tx)?,
            price: required_number(&csv_record.value, &op, "price", tx)?,
            duration: required_number(&csv_record.duration, &op, "duration", tx)?,
        },
        "add_funds" => Action::AddFunds {
            amount: required_number(&csv_record.value, &op, "amount", tx)?,
        },
        "accept" => Action::Accept,
        "fulfill" => Action::Fulfill,
        "dispute" => Action::Dispute,
        "resolve_dispute" => {
            let raw = required_text(&csv_record.text, &op, "resolution", tx)?;
            Action::ResolveDispute {
                resolution: parse_resolution(&raw, tx)?,
            }
        }
        "release_payment" => Action::ReleasePayment {
            review: cell(&csv_record.text).unwrap_or_default().to_string(),
        },
        "cancel" => Action::Cancel,
        "request_refund" => Action::RequestRefund,
        "rate" => Action::Rate {
            rating: required_number(&csv_record.value, &op, "rating", tx)?,
        },
        "update_book" => Action::UpdateBook {
            book: BookId::new(required_text(&csv_record.text, &op, "book", tx)?),
        },
        "update_price" => Action::UpdatePrice {
            price: required_number(&csv_record.value, &op, "price", tx)?,
        },
        "update_quantity" => Action::UpdateQuantity {
            quantity: required_number(&csv_record.quantity, &op, "quantity", tx)?,
        },
        "update_deadline" => Action::UpdateDeadline {
            deadline: required_number(&csv_record.value, &op, "deadline", tx)?,
        },
        "update_status" => Action::UpdateStatus {
            status: required_text(&csv_record.text, &op, "status", tx)?,
        },
        _ => {
            return Err(EscrowError::invalid_command_type(
                &csv_record.op,
                Some(tx),
            ))
        }
    };

    Ok(EscrowCommand {
        tx,
        caller: PartyId::from(caller),
        now: csv_record.now,
        action,
    })
}

/// Write transaction records to CSV
///
/// Columns: tx, customer, store, book, quantity, price, escrow, state, rating,
/// status, deadline. Records are sorted by transaction ID; an unassigned store
/// and a missing rating are written as empty cells.
pub fn write_transactions_csv(
    records: &[TransactionRecord],
    output: &mut dyn Write,
) -> Result<(), EscrowError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "tx", "customer", "store", "book", "quantity", "price", "escrow", "state", "rating",
        "status", "deadline",
    ])?;

    let mut sorted: Vec<&TransactionRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.id());

    for record in sorted {
        writer.write_record(&[
            record.id().to_string(),
            record.customer().to_string(),
            record.store().map(ToString::to_string).unwrap_or_default(),
            record.book().to_string(),
            record.quantity().to_string(),
            record.price().to_string(),
            record.escrow_balance().to_string(),
            record.state().label().to_string(),
            record.rating().map(|r| r.to_string()).unwrap_or_default(),
            record.status().to_string(),
            record.deadline().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write party balances to CSV
///
/// Columns: party, escrowed, received, reviews (count). Sorted by party ID.
pub fn write_parties_csv(
    balances: &[PartyBalance],
    output: &mut dyn Write,
) -> Result<(), EscrowError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["party", "escrowed", "received", "reviews"])?;

    let mut sorted: Vec<&PartyBalance> = balances.iter().collect();
    sorted.sort_by(|a, b| a.party.cmp(&b.party));

    for balance in sorted {
        writer.write_record(&[
            balance.party.to_string(),
            balance.escrowed.to_string(),
            balance.received.to_string(),
            balance.reviews.len().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the selected report of a snapshot
pub fn write_report(
    snapshot: &LedgerSnapshot,
    report: ReportType,
    output: &mut dyn Write,
) -> Result<(), EscrowError> {
    match report {
        ReportType::Transactions => write_transactions_csv(&snapshot.transactions, output),
        ReportType::Parties => write_parties_csv(&snapshot.parties, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Funds, TransactionState};
    use rstest::rstest;

    fn csv_record(
        op: &str,
        value: Option<&str>,
        quantity: Option<&str>,
        text: Option<&str>,
    ) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            tx: 1,
            caller: "alice".to_string(),
            now: 10,
            value: value.map(str::to_string),
            quantity: quantity.map(str::to_string),
            duration: None,
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_convert_create() {
        let mut record = csv_record("create", Some("250"), Some("2"), Some("B7"));
        record.duration = Some("1000".to_string());

        let command = convert_csv_record(record).unwrap();
        assert_eq!(command.tx, 1);
        assert_eq!(command.caller, PartyId::from("alice"));
        assert_eq!(command.now, 10);
        assert_eq!(
            command.action,
            Action::Create {
                book: BookId::from("B7"),
                quantity: 2,
                price: 250,
                duration: 1000,
            }
        );
    }

    #[rstest]
    #[case("accept", Action::Accept)]
    #[case("FULFILL", Action::Fulfill)]
    #[case("Dispute", Action::Dispute)]
    #[case("cancel", Action::Cancel)]
    #[case("request_refund", Action::RequestRefund)]
    fn test_convert_operations_without_operands(#[case] op: &str, #[case] expected: Action) {
        let command = convert_csv_record(csv_record(op, None, None, None)).unwrap();
        assert_eq!(command.action, expected);
    }

    #[rstest]
    #[case("customer", Resolution::InFavorOfCustomer)]
    #[case(" Store ", Resolution::InFavorOfStore)]
    fn test_convert_resolution(#[case] text: &str, #[case] expected: Resolution) {
        let command = convert_csv_record(csv_record("resolve_dispute", None, None, Some(text)))
            .unwrap();
        assert_eq!(
            command.action,
            Action::ResolveDispute {
                resolution: expected
            }
        );
    }

    #[test]
    fn test_convert_release_without_review_text() {
        let command = convert_csv_record(csv_record("release_payment", None, None, None))
            .unwrap();
        assert_eq!(
            command.action,
            Action::ReleasePayment {
                review: String::new()
            }
        );
    }

    #[rstest]
    #[case::unknown_op("chargeback", None, None, None, "Invalid command type")]
    #[case::missing_amount("add_funds", None, None, None, "requires amount")]
    #[case::blank_amount("add_funds", Some("  "), None, None, "requires amount")]
    #[case::bad_amount("add_funds", Some("ten"), None, None, "Invalid amount")]
    #[case::negative_amount("add_funds", Some("-5"), None, None, "Invalid amount")]
    #[case::rating_too_wide("rate", Some("300"), None, None, "Invalid rating")]
    #[case::bad_resolution("resolve_dispute", None, None, Some("both"), "Invalid resolution")]
    #[case::missing_status("update_status", None, None, None, "requires status")]
    #[case::missing_create_book("create", Some("1"), Some("1"), None, "requires book")]
    fn test_convert_errors(
        #[case] op: &str,
        #[case] value: Option<&str>,
        #[case] quantity: Option<&str>,
        #[case] text: Option<&str>,
        #[case] expected: &str,
    ) {
        let err = convert_csv_record(csv_record(op, value, quantity, text))
            .unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{}' in '{}'",
            expected,
            err
        );
    }

    #[test]
    fn test_convert_missing_caller() {
        let mut record = csv_record("accept", None, None, None);
        record.caller = " ".to_string();

        let err = convert_csv_record(record).unwrap_err();
        assert!(matches!(err, EscrowError::MissingField { .. }));
    }

    #[test]
    fn test_write_transactions_csv() {
        let open =
            TransactionRecord::create(2, PartyId::from("bob"), BookId::from("B2"), 1, 40, 100, 0);
        let mut accepted = TransactionRecord::create(
            1,
            PartyId::from("alice"),
            BookId::from("B1"),
            3,
            90,
            500,
            10,
        );
        accepted
            .add_funds(&PartyId::from("alice"), Funds::new(90))
            .unwrap();
        accepted.accept(&PartyId::from("shop")).unwrap();
        accepted.rate(&PartyId::from("alice"), 4).unwrap();
        assert!(matches!(accepted.state(), TransactionState::Accepted { .. }));

        let mut output = Vec::new();
        write_transactions_csv(&[open, accepted], &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "tx,customer,store,book,quantity,price,escrow,state,rating,status,deadline\n\
             1,alice,shop,B1,3,90,90,accepted,4,open,510\n\
             2,bob,,B2,1,40,0,open,,open,100\n"
        );
    }

    #[test]
    fn test_write_parties_csv_sorted() {
        let mut alice = PartyBalance::new(PartyId::from("alice"));
        alice.escrowed = 100;
        let mut shop = PartyBalance::new(PartyId::from("shop"));
        shop.received = 100;

        let mut output = Vec::new();
        write_parties_csv(&[shop, alice], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "party,escrowed,received,reviews\nalice,100,0,0\nshop,0,100,0\n"
        );
    }

    #[test]
    fn test_write_empty_report_has_header_only() {
        let mut output = Vec::new();
        write_report(&LedgerSnapshot::default(), ReportType::Parties, &mut output)
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "party,escrowed,received,reviews\n");
    }
}
