//! Inline HTML pages served by both variants.
//!
//! Every interpolated value goes through [`escape`].

use axum::http::StatusCode;
use shopform_types::Classification;

const STYLE: &str = r#"<style>
    body { font-family: Arial, sans-serif; margin: 0; padding: 0; background-color: #f2f2f2; }
    .container { width: 600px; margin: 50px auto; background-color: #fff; padding: 20px;
                 border-radius: 8px; box-shadow: 0 0 10px rgba(0, 0, 0, 0.1); }
    h1 { text-align: center; }
    form { margin-bottom: 20px; }
    label { display: block; margin-bottom: 5px; }
    input[type="text"], select { width: calc(100% - 22px); padding: 10px; margin-bottom: 10px;
                                 border: 1px solid #ccc; border-radius: 4px; }
    input[type="submit"] { width: 100%; padding: 10px 0; background-color: #4CAF50; color: white;
                           border: none; border-radius: 4px; cursor: pointer; }
    input[type="submit"]:hover { background-color: #45a049; }
    .meta { text-align: center; color: #666; }
    .error { color: #b00020; }
</style>"#;

const INTAKE_FIELDS: [(&str, &str); 5] = [
    ("name", "Name"),
    ("mobile_number", "Mobile Number"),
    ("whatsapp_number", "WhatsApp Number"),
    ("email", "Email"),
    ("locality", "Locality"),
];

/// Escape text for use in element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{STYLE}\n</head>\n<body>\n<div class=\"container\">\n{body}\n</div>\n</body>\n</html>\n",
        escape(title)
    )
}

fn intake_inputs() -> String {
    INTAKE_FIELDS
        .iter()
        .map(|(field, label)| {
            format!(
                "<label for=\"{field}\">{label}:</label>\n<input type=\"text\" id=\"{field}\" name=\"{field}\" required><br>\n"
            )
        })
        .collect()
}

/// Home page of the store server: intake form plus classification form.
pub fn store_home() -> String {
    let body = format!(
        r#"<h1>User Data Submission</h1>
<form id="user-form" action="/submit_user_data/" method="post">
{inputs}<input type="submit" value="Submit">
</form>
<form id="classification-form" action="/classify_users/" method="post">
<label for="user_id">User ID:</label>
<input type="text" id="user_id" name="user_id" required><br>
<label for="classification">Classify User (A, B, C):</label>
<input type="text" id="classification" name="classification" required><br>
<input type="submit" value="Classify">
</form>"#,
        inputs = intake_inputs()
    );
    page("User Data Submission", &body)
}

/// Home page of the sheet server, showing the current local time.
pub fn sheet_home(now: &str) -> String {
    let body = format!(
        r#"<h1>Shopkeeper Data</h1>
<p class="meta">{now}</p>
<form id="user-form" action="/classify" method="post">
{inputs}<input type="submit" value="Next">
</form>"#,
        now = escape(now),
        inputs = intake_inputs()
    );
    page("Shopkeeper Data", &body)
}

/// Second page of the sheet flow: a fixed A/B/C selector plus hidden state.
pub fn classify_page(name: &str, hidden: &[(&str, &str)]) -> String {
    let hidden_inputs: String = hidden
        .iter()
        .map(|(field, value)| {
            format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                escape(field),
                escape(value)
            )
        })
        .collect();
    let options: String = Classification::ALL
        .iter()
        .map(|c| format!("<option value=\"{c}\">{c}</option>\n"))
        .collect();
    let body = format!(
        r#"<h1>Classify Shopkeeper</h1>
<p class="meta">{name}</p>
<form id="classification-form" action="/" method="post">
{hidden_inputs}<label for="classification">Classification:</label>
<select id="classification" name="classification" required>
{options}</select><br>
<input type="submit" value="Submit">
</form>"#,
        name = escape(name),
    );
    page("Classify Shopkeeper", &body)
}

/// Error page shown by the sheet server.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{code}</h1>
<p class="error">{message}</p>
<p><a href="/">Back to the form</a></p>"#,
        code = status.as_u16(),
        message = escape(message)
    );
    page("Error", &body)
}
