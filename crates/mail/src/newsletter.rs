use chrono::NaiveDate;

/// Wrap newsletter content in the standard layout with a dated header and
/// an unsubscribe footer.
pub fn newsletter_html(title: &str, content: &str, date: NaiveDate) -> String {
    let date = date.format("%B %d, %Y");
    format!(
        r##"<html>
<body style="font-family: Arial, sans-serif; max-width: 700px; margin: 0 auto; background-color: #f4f4f4;">
    <div style="background-color: white; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1);">
        <div style="text-align: center; margin-bottom: 30px;">
            <h1 style="color: #333; margin-bottom: 10px;">{title}</h1>
            <p style="color: #666; font-size: 14px;">{date}</p>
        </div>

        <div style="line-height: 1.6; color: #333;">
            {content}
        </div>

        <hr style="margin: 30px 0; border: none; border-top: 1px solid #eee;">

        <div style="text-align: center; color: #666; font-size: 12px;">
            <p>This newsletter was sent to you because you're subscribed to our updates.</p>
            <p>To unsubscribe, click <a href="#" style="color: #007bff;">here</a></p>
        </div>
    </div>
</body>
</html>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_contains_title_date_and_footer() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        let html = newsletter_html("Autumn News", "<p>Hello</p>", date);
        assert!(html.contains("Autumn News</h1>"));
        assert!(html.contains("October 06, 2026"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("To unsubscribe"));
    }
}
