//! The form for creating and editing transactions, and its validation.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        loading_spinner,
    },
    transaction::core::{
        Transaction, TransactionFields, TransactionId, TransactionType,
        description_is_long_enough, format_iso_date, normalize_card_name,
    },
};

const CARD_NAME_FIELD_ID: &str = "card-name-field";

/// The raw form data submitted when creating or editing a transaction.
///
/// Every field is kept as text so that an invalid submission can be shown
/// back to the user exactly as they typed it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    /// One of "entrada", "saida" or "cartao".
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// The amount of money, e.g. "100.50".
    pub value: Option<String>,
    /// An ISO date, e.g. "2024-03-15".
    pub date: Option<String>,
    /// Text detailing the transaction.
    pub description: Option<String>,
    /// The category used to group the transaction.
    pub category: Option<String>,
    /// The card the transaction was charged to.
    pub card_name: Option<String>,
}

/// The validation messages for each field of a [TransactionForm].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub type_: Option<&'static str>,
    pub value: Option<&'static str>,
    pub date: Option<&'static str>,
    pub description: Option<&'static str>,
    pub category: Option<&'static str>,
}

impl FormErrors {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TransactionForm {
    /// Check the submitted values and convert them to [TransactionFields].
    ///
    /// # Errors
    /// Returns the messages to show next to each invalid field.
    pub fn validate(&self) -> Result<TransactionFields, FormErrors> {
        let mut errors = FormErrors::default();

        let type_ = parse_type(self.type_.as_deref());
        if type_.is_none() {
            errors.type_ = Some("Selecione um tipo válido.");
        }

        let value = self
            .value
            .as_deref()
            .and_then(parse_value)
            .filter(|value| value.is_finite() && *value > 0.0);
        if value.is_none() {
            errors.value = Some("Informe um valor maior que zero.");
        }

        let date = self.date.as_deref().and_then(parse_date);
        if date.is_none() {
            errors.date = Some("Informe uma data válida.");
        }

        let description = self.description.as_deref().unwrap_or_default().trim();
        if !description_is_long_enough(description) {
            errors.description = Some("A descrição deve ter pelo menos 2 caracteres.");
        }

        let category = self.category.as_deref().unwrap_or_default().trim();
        if category.is_empty() {
            errors.category = Some("Informe uma categoria.");
        }

        match (type_, value, date) {
            (Some(type_), Some(value), Some(date)) if errors.is_empty() => Ok(TransactionFields {
                type_,
                value,
                date,
                description: description.to_owned(),
                category: category.to_owned(),
                card_name: normalize_card_name(type_, self.card_name.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_type(text: Option<&str>) -> Option<TransactionType> {
    let text = text?;

    TransactionType::ALL
        .into_iter()
        .find(|type_| type_.as_str() == text)
}

/// Parse an amount typed either with a dot or a comma as the decimal separator.
fn parse_value(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse().ok()
}

fn parse_date(text: &str) -> Option<Date> {
    let mut parts = text.trim().splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = Month::try_from(parts.next()?.parse::<u8>().ok()?).ok()?;
    let day = parts.next()?.parse().ok()?;

    Date::from_calendar_date(year, month, day).ok()
}

/// Whether the form creates a new transaction or updates an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(TransactionId),
}

impl FormMode {
    /// The page and form heading.
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Nova Transação",
            FormMode::Edit(_) => "Editar Transação",
        }
    }

    fn submit_text(&self) -> &'static str {
        match self {
            FormMode::Create => "Salvar",
            FormMode::Edit(_) => "Atualizar",
        }
    }
}

/// The values shown in the form inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub type_: TransactionType,
    pub value: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub card_name: String,
}

impl FormValues {
    /// Empty values for a new transaction dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            type_: TransactionType::default(),
            value: String::new(),
            date: format_iso_date(today),
            description: String::new(),
            category: String::new(),
            card_name: String::new(),
        }
    }
}

impl From<&Transaction> for FormValues {
    fn from(transaction: &Transaction) -> Self {
        Self {
            type_: transaction.type_,
            value: format!("{:.2}", transaction.value),
            date: transaction.iso_date(),
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            card_name: transaction.card_name.clone().unwrap_or_default(),
        }
    }
}

impl From<&TransactionForm> for FormValues {
    fn from(form: &TransactionForm) -> Self {
        Self {
            type_: parse_type(form.type_.as_deref()).unwrap_or_default(),
            value: form.value.clone().unwrap_or_default(),
            date: form.date.clone().unwrap_or_default(),
            description: form.description.clone().unwrap_or_default(),
            category: form.category.clone().unwrap_or_default(),
            card_name: form.card_name.clone().unwrap_or_default(),
        }
    }
}

fn error_message(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}

/// Render the transaction form.
///
/// Submitting the form swaps the response in place of the form, so that a
/// failed validation shows the form again with `errors` next to the fields.
pub fn transaction_form(mode: &FormMode, values: &FormValues, errors: &FormErrors) -> Markup {
    let spinner = loading_spinner();
    let is_card = values.type_ == TransactionType::Cartao;
    let (hx_post, hx_put) = match mode {
        FormMode::Create => (Some(endpoints::TRANSACTIONS_API.to_owned()), None),
        FormMode::Edit(id) => (
            None,
            Some(format_endpoint(endpoints::TRANSACTION, id.as_str())),
        ),
    };
    let toggle_card_name = format!(
        "document.getElementById('{CARD_NAME_FIELD_ID}').classList.toggle('hidden', this.value !== 'cartao')"
    );

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { (mode.title()) }

            div
            {
                label
                    for="type"
                    class=(FORM_LABEL_STYLE)
                {
                    "Tipo"
                }

                select
                    name="type"
                    id="type"
                    required
                    onchange=(toggle_card_name)
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for type_ in TransactionType::ALL {
                        option value=(type_.as_str()) selected[type_ == values.type_] { (type_.label()) }
                    }
                }

                (error_message(errors.type_))
            }

            div
            {
                label
                    for="value"
                    class=(FORM_LABEL_STYLE)
                {
                    "Valor (R$)"
                }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="value"
                        id="value"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0,00"
                        required
                        autofocus[errors.value.is_some()]
                        value=(values.value)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (error_message(errors.value))
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Data"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(values.date)
                    class=(FORM_TEXT_INPUT_STYLE);

                (error_message(errors.date))
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Descrição"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    minlength="2"
                    placeholder="Ex: Supermercado"
                    required
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);

                (error_message(errors.description))
            }

            div
            {
                label
                    for="category"
                    class=(FORM_LABEL_STYLE)
                {
                    "Categoria"
                }

                input
                    name="category"
                    id="category"
                    type="text"
                    placeholder="Ex: Alimentação"
                    required
                    value=(values.category)
                    class=(FORM_TEXT_INPUT_STYLE);

                (error_message(errors.category))
            }

            div id=(CARD_NAME_FIELD_ID) class=[(!is_card).then_some("hidden")]
            {
                label
                    for="card_name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Nome do Cartão"
                }

                input
                    name="card_name"
                    id="card_name"
                    type="text"
                    placeholder="Ex: Nubank"
                    value=(values.card_name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                (mode.submit_text())
            }
        }
    }
}
