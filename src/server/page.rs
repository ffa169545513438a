//! HTML rendering for the prediction form.

use std::fmt::Write;

use crate::features::RawInputs;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f4f1ea; color: #1d2733; margin: 0; }
main { max-width: 32rem; margin: 3rem auto; background: #fff; padding: 2rem; border-radius: 8px;
       box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08); }
h1 { margin-top: 0; font-size: 1.5rem; }
label { display: block; margin-top: 0.8rem; font-weight: 600; }
input, select { width: 100%; padding: 0.4rem; margin-top: 0.2rem; box-sizing: border-box; }
button { margin-top: 1.2rem; padding: 0.6rem 1.2rem; background: #1d4e89; color: #fff;
         border: none; border-radius: 4px; cursor: pointer; }
.result { margin-top: 1.5rem; padding: 1rem; background: #e8f0fa; border-radius: 4px; }
.notice { margin-bottom: 1rem; padding: 0.8rem; background: #fbe9e7; border-radius: 4px; }
"#;

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_input(html: &mut String, name: &str, label: &str, value: &str) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">\n",
        name = name,
        label = label,
        value = escape_html(value),
    );
}

/// Renders a select, keeping an unrecognised submitted value as an extra
/// selected option so it is echoed unchanged.
fn select(html: &mut String, name: &str, label: &str, options: &[(&str, &str)], value: &str) {
    let _ = writeln!(html, "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">");
    let mut matched = false;
    for (option, caption) in options {
        let selected = if *option == value {
            matched = true;
            " selected"
        } else {
            ""
        };
        let _ = writeln!(html, "<option value=\"{option}\"{selected}>{caption}</option>");
    }
    if !matched {
        let escaped = escape_html(value);
        let _ = writeln!(html, "<option value=\"{escaped}\" selected>{escaped}</option>");
    }
    html.push_str("</select>\n");
}

/// Renders the full page with the echoed inputs and an optional result.
///
/// `model_available` controls a notice telling the user that predictions are
/// disabled.
pub fn render(prediction: Option<&str>, inputs: &RawInputs, model_available: bool) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Titanic Survival Predictor</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n<h1>Would you have survived the Titanic?</h1>\n");

    if !model_available {
        html.push_str(
            "<p class=\"notice\">The prediction model could not be loaded. Predictions are unavailable.</p>\n",
        );
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");
    select(
        &mut html,
        "pclass",
        "Passenger class",
        &[("1", "1st class"), ("2", "2nd class"), ("3", "3rd class")],
        &inputs.pclass,
    );
    text_input(&mut html, "age", "Age", &inputs.age);
    text_input(&mut html, "fare", "Fare", &inputs.fare);
    text_input(&mut html, "sibsp", "Siblings / spouses aboard", &inputs.sibsp);
    text_input(&mut html, "parch", "Parents / children aboard", &inputs.parch);
    select(
        &mut html,
        "sex",
        "Sex",
        &[("female", "Female"), ("male", "Male")],
        &inputs.sex,
    );
    select(
        &mut html,
        "embarked",
        "Port of embarkation",
        &[("C", "Cherbourg"), ("Q", "Queenstown"), ("S", "Southampton")],
        &inputs.embarked,
    );
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(text) = prediction {
        let _ = writeln!(html, "<p class=\"result\">{}</p>", escape_html(text));
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">&'x'</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;x&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_default_page_has_no_result() {
        let html = render(None, &RawInputs::default(), true);
        assert!(html.contains("name=\"age\" value=\"30.0\""));
        assert!(html.contains("name=\"fare\" value=\"50.00\""));
        assert!(html.contains("<option value=\"3\" selected>"));
        assert!(html.contains("<option value=\"female\" selected>"));
        assert!(html.contains("<option value=\"S\" selected>"));
        assert!(!html.contains("class=\"result\""));
        assert!(!html.contains("class=\"notice\""));
    }

    #[test]
    fn test_result_and_notice_are_rendered() {
        let html = render(Some("Prediction: the passenger would have died."), &RawInputs::default(), false);
        assert!(html.contains("<p class=\"result\">Prediction: the passenger would have died.</p>"));
        assert!(html.contains("class=\"notice\""));
    }

    #[test]
    fn test_echoed_values_are_escaped() {
        let inputs = RawInputs {
            age: "\"><script>".to_string(),
            ..RawInputs::default()
        };
        let html = render(None, &inputs, true);
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_unknown_select_value_is_kept() {
        let inputs = RawInputs {
            embarked: "X".to_string(),
            ..RawInputs::default()
        };
        let html = render(None, &inputs, true);
        assert!(html.contains("<option value=\"X\" selected>X</option>"));
        assert!(!html.contains("<option value=\"S\" selected>"));
    }
}
