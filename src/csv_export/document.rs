//! Builds the CSV document and its file name.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    Error,
    aggregation::filter_by_month,
    transaction::{Transaction, format_br_date},
};

const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 6] = [
    "Data",
    "Tipo",
    "Descrição",
    "Categoria",
    "Valor (R$)",
    "Cartão",
];

/// A CSV file ready to be downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    /// The suggested file name, e.g. "transacoes-2024-03.csv".
    pub file_name: String,
    /// The UTF-8 encoded file contents, starting with a byte order mark.
    pub contents: Vec<u8>,
}

/// Write the transactions of `month` (or all transactions if `month` is
/// `None`) to a CSV document.
///
/// # Errors
/// Returns [Error::NothingToExport] if `transactions` is empty,
/// [Error::NoTransactionsInMonth] if no transaction falls in `month`, or
/// [Error::CsvError] if the document could not be written.
pub fn export_csv(transactions: &[Transaction], month: Option<&str>) -> Result<CsvExport, Error> {
    if transactions.is_empty() {
        return Err(Error::NothingToExport);
    }

    let month = month.filter(|month| !month.is_empty());
    let rows = filter_by_month(transactions, month);

    let file_name = match month {
        Some(month) if rows.is_empty() => {
            return Err(Error::NoTransactionsInMonth(month.to_owned()));
        }
        Some(month) => format!("transacoes-{month}.csv"),
        None => "transacoes-completas.csv".to_owned(),
    };

    Ok(CsvExport {
        file_name,
        contents: write_document(&rows)?,
    })
}

fn write_document(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BYTE_ORDER_MARK.to_vec());

    writer.write_record(HEADER).map_err(csv_error)?;

    for transaction in transactions {
        writer
            .write_record([
                format_br_date(transaction.date).as_str(),
                transaction.type_.as_str(),
                transaction.description.as_str(),
                transaction.category.as_str(),
                format_value(transaction.value).as_str(),
                transaction.card_name.as_deref().unwrap_or("-"),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(|error| {
        tracing::error!("could not flush CSV document: {error}");
        Error::CsvError(error.to_string())
    })
}

fn csv_error(error: csv::Error) -> Error {
    tracing::error!("could not write CSV record: {error}");
    Error::CsvError(error.to_string())
}

fn format_value(value: f64) -> String {
    format!("R$ {value:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{Transaction, TransactionFields, TransactionId, TransactionType},
    };

    use super::export_csv;

    fn salary() -> Transaction {
        Transaction::from_fields(
            TransactionId::new(),
            TransactionFields::build(
                TransactionType::Entrada,
                100.5,
                date!(2024 - 03 - 15),
                "Salário",
                "Trabalho",
            ),
        )
    }

    fn card_charge() -> Transaction {
        Transaction::from_fields(
            TransactionId::new(),
            TransactionFields::build(
                TransactionType::Cartao,
                1234.0,
                date!(2024 - 01 - 05),
                "Jantar \"especial\"",
                "Lazer",
            )
            .card_name(Some("Nubank")),
        )
    }

    fn contents_as_text(contents: &[u8]) -> &str {
        std::str::from_utf8(contents).expect("CSV should be valid UTF-8")
    }

    #[test]
    fn exports_all_transactions() {
        let got = export_csv(&[salary()], None).unwrap();

        assert_eq!(got.file_name, "transacoes-completas.csv");
        assert_eq!(
            contents_as_text(&got.contents),
            "\u{feff}\"Data\";\"Tipo\";\"Descrição\";\"Categoria\";\"Valor (R$)\";\"Cartão\"\n\
             \"15/03/2024\";\"entrada\";\"Salário\";\"Trabalho\";\"R$ 100,50\";\"-\"\n"
        );
    }

    #[test]
    fn starts_with_byte_order_mark() {
        let got = export_csv(&[salary()], None).unwrap();

        assert_eq!(&got.contents[..3], b"\xEF\xBB\xBF");
    }

    #[test]
    fn doubles_inner_quotes_and_writes_card_name() {
        let got = export_csv(&[card_charge()], None).unwrap();
        let text = contents_as_text(&got.contents);

        assert!(
            text.contains(
                "\"05/01/2024\";\"cartao\";\"Jantar \"\"especial\"\"\";\"Lazer\";\"R$ 1234,00\";\"Nubank\""
            ),
            "got {text}"
        );
    }

    #[test]
    fn exports_only_selected_month() {
        let got = export_csv(&[salary(), card_charge()], Some("2024-01")).unwrap();
        let text = contents_as_text(&got.contents);

        assert_eq!(got.file_name, "transacoes-2024-01.csv");
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Nubank"));
        assert!(!text.contains("Salário"));
    }

    #[test]
    fn empty_month_filter_exports_everything() {
        let got = export_csv(&[salary(), card_charge()], Some("")).unwrap();

        assert_eq!(got.file_name, "transacoes-completas.csv");
        assert_eq!(contents_as_text(&got.contents).lines().count(), 3);
    }

    #[test]
    fn refuses_empty_list() {
        assert_eq!(export_csv(&[], None), Err(Error::NothingToExport));
        assert_eq!(export_csv(&[], Some("2024-03")), Err(Error::NothingToExport));
    }

    #[test]
    fn refuses_month_without_transactions() {
        assert_eq!(
            export_csv(&[salary()], Some("2023-12")),
            Err(Error::NoTransactionsInMonth("2023-12".to_owned()))
        );
    }
}
