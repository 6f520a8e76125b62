/// Replace `${VAR}` and `${VAR:-fallback}` placeholders using the process
/// environment.
///
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with an explicit variable lookup.
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder untouched.
            out.push_str(&rest[start..]);
            return out;
        };

        let body = &after[..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };

        match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => match fallback {
                Some(fallback) if !name.is_empty() => out.push_str(fallback),
                _ => {
                    out.push_str("${");
                    out.push_str(body);
                    out.push('}');
                },
            },
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
