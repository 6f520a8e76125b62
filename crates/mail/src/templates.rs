//! Built-in HTML email templates.
//!
//! Placeholders are `{key}`; `{{` and `}}` render literal braces. Values are
//! inserted verbatim (no escaping), so callers own the HTML they pass in.

use {
    serde_json::{Map, Value},
    switchboard_common::{Error, Result},
};

pub type TemplateData = Map<String, Value>;

struct Template {
    name: &'static str,
    subject: &'static str,
    html: &'static str,
}

const WELCOME_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background-color: #f8f9fa; padding: 20px; border-radius: 10px;">
        <h2 style="color: #007bff;">Welcome, {name}!</h2>
        <p>Thank you for joining our service. We're excited to have you on board!</p>
        <p>Your account details:</p>
        <ul>
            <li><strong>Email:</strong> {email}</li>
            <li><strong>Account ID:</strong> {account_id}</li>
            <li><strong>Join Date:</strong> {join_date}</li>
        </ul>
        <p>If you have any questions, feel free to contact us.</p>
        <p>Best regards,<br>The Team</p>
    </div>
</body>
</html>"#;

const NOTIFICATION_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background-color: #fff3cd; padding: 20px; border-radius: 10px; border-left: 5px solid #ffc107;">
        <h3 style="color: #856404;">{title}</h3>
        <p>{message}</p>
        <p><strong>Date:</strong> {date}</p>
        <p><strong>Priority:</strong> {priority}</p>
        <p>Please take necessary action if required.</p>
    </div>
</body>
</html>"#;

const REPORT_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background-color: #d1ecf1; padding: 20px; border-radius: 10px;">
        <h2 style="color: #0c5460;">Monthly Report</h2>
        <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
            <tr style="background-color: #e2e3e5;">
                <th style="padding: 10px; border: 1px solid #dee2e6; text-align: left;">Metric</th>
                <th style="padding: 10px; border: 1px solid #dee2e6; text-align: left;">Value</th>
            </tr>
            <tr>
                <td style="padding: 10px; border: 1px solid #dee2e6;">Total Users</td>
                <td style="padding: 10px; border: 1px solid #dee2e6;">{total_users}</td>
            </tr>
            <tr>
                <td style="padding: 10px; border: 1px solid #dee2e6;">Revenue</td>
                <td style="padding: 10px; border: 1px solid #dee2e6;">${revenue}</td>
            </tr>
            <tr>
                <td style="padding: 10px; border: 1px solid #dee2e6;">Growth Rate</td>
                <td style="padding: 10px; border: 1px solid #dee2e6;">{growth_rate}%</td>
            </tr>
        </table>
        <p><strong>Summary:</strong> {summary}</p>
    </div>
</body>
</html>"#;

const TEMPLATES: &[Template] = &[
    Template {
        name: "welcome",
        subject: "Welcome to Our Service!",
        html: WELCOME_HTML,
    },
    Template {
        name: "notification",
        subject: "Important Notification",
        html: NOTIFICATION_HTML,
    },
    Template {
        name: "report",
        subject: "Monthly Report - {month}",
        html: REPORT_HTML,
    },
    Template {
        name: "custom",
        subject: "{subject}",
        html: "{html_content}",
    },
];

/// Subject and body after substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub html: String,
}

pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}

pub fn render_template(name: &str, data: &TemplateData) -> Result<Rendered> {
    let template = TEMPLATES.iter().find(|t| t.name == name).ok_or_else(|| {
        Error::invalid(format!(
            "Template '{name}' not found. Available templates: {}",
            template_names().join(", ")
        ))
    })?;

    Ok(Rendered {
        subject: fill(template.subject, data)?,
        html: fill(template.html, data)?,
    })
}

fn fill(source: &str, data: &TemplateData) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            },
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            },
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                if !closed {
                    return Err(Error::invalid("unterminated template placeholder"));
                }
                let value = data.get(&key).ok_or_else(|| {
                    Error::invalid(format!("Missing required template data: '{key}'"))
                })?;
                out.push_str(&display_value(value));
            },
            other => out.push(other),
        }
    }

    Ok(out)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn data(value: Value) -> TemplateData {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn welcome_inserts_values_verbatim() {
        let rendered = render_template(
            "welcome",
            &data(json!({
                "name": "Ada <b>L</b>",
                "email": "ada@example.com",
                "account_id": 42,
                "join_date": "2026-10-16"
            })),
        )
        .unwrap();
        assert_eq!(rendered.subject, "Welcome to Our Service!");
        assert!(rendered.html.contains("Welcome, Ada <b>L</b>!"));
        assert!(rendered.html.contains("<strong>Account ID:</strong> 42"));
    }

    #[test]
    fn report_substitutes_subject_and_keeps_dollar_sign() {
        let rendered = render_template(
            "report",
            &data(json!({
                "month": "October",
                "total_users": 1200,
                "revenue": "5,000",
                "growth_rate": 12.5,
                "summary": "Steady"
            })),
        )
        .unwrap();
        assert_eq!(rendered.subject, "Monthly Report - October");
        assert!(rendered.html.contains("$5,000"));
        assert!(rendered.html.contains("12.5%"));
    }

    #[test]
    fn missing_key_is_named() {
        let err = render_template("notification", &data(json!({ "title": "t" }))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required template data: 'message'");
    }

    #[test]
    fn unknown_template_lists_available() {
        let err = render_template("promo", &TemplateData::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Template 'promo' not found. Available templates: welcome, notification, report, custom"
        );
    }

    #[test]
    fn custom_passes_html_through_and_escapes_braces() {
        let rendered = render_template(
            "custom",
            &data(json!({ "subject": "Hi", "html_content": "<p>{not a key}</p>" })),
        )
        .unwrap();
        assert_eq!(rendered.html, "<p>{not a key}</p>");

        assert_eq!(fill("{{literal}}", &TemplateData::new()).unwrap(), "{literal}");
    }
}
