use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Checks that a required input called `name` with the given type exists and
/// has a label pointing at it.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );

    if let Some(id) = input.value().attr("id") {
        let label = Selector::parse(&format!("label[for=\"{id}\"]")).unwrap();
        assert!(
            form.select(&label).next().is_some(),
            "want a label for input {name}"
        );
    }
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input = must_get_input(form, name);
    let input_value = input.value().attr("value").unwrap_or_default();
    assert_eq!(
        input_value, value,
        "want input {name} with value \"{value}\", got {input_value:?}"
    );
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let submit_button = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("No submit button found");

    let got_text = submit_button.text().collect::<String>();
    assert_eq!(text, got_text.trim());
}

/// Checks that one of the form's paragraphs reads `want_error_message`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let messages: Vec<String> = form
        .select(&Selector::parse("p").unwrap())
        .map(|p| p.text().collect::<String>().trim().to_owned())
        .collect();

    assert!(
        messages.iter().any(|message| message == want_error_message),
        "want error message {want_error_message:?}, got {messages:?}"
    );
}
