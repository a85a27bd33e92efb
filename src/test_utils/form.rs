use scraper::{ElementRef, Html, Selector};

#[track_caller]
fn select_first<'a>(element: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    element.select(&Selector::parse(selector).unwrap()).next()
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("no form found")
}

/// Assert that `form` sends its data to `endpoint` via the HTMX `attribute`,
/// e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("form has no {attribute} attribute"));

    assert_eq!(got, endpoint, "want form with {attribute}=\"{endpoint}\"");
}

/// Find the required input `name` and check its type.
#[track_caller]
fn must_get_required_input<'a>(form: &ElementRef<'a>, name: &str, type_: &str) -> ElementRef<'a> {
    let input = select_first(form, &format!("input[name=\"{name}\"]"))
        .unwrap_or_else(|| panic!("no input named {name:?}"));

    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(got_type, type_, "want input {name:?} with type {type_:?}");
    assert!(
        input.value().attr("required").is_some(),
        "want input {name:?} to be required"
    );

    input
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    must_get_required_input(form, name, type_);
}

/// Like [assert_form_input], and also checks the value kept from the last submission.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    let input = must_get_required_input(form, name, type_);

    let got_value = input.value().attr("value").unwrap_or_default();
    assert_eq!(got_value, value, "want input {name:?} with value {value:?}");
}

#[track_caller]
fn must_get_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    select_first(form, "button[type=submit]").expect("no submit button found")
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    must_get_submit_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = must_get_submit_button(form);

    assert_eq!(button.text().collect::<String>().trim(), text);
}

/// The text of the error line under a form, see `html::form_error`.
#[track_caller]
pub(crate) fn form_error_message(element: &ElementRef<'_>) -> String {
    select_first(element, "p.text-red-600")
        .expect("no error message found")
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    assert_eq!(form_error_message(form), want_error_message);
}
