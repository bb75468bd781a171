use std::env;

/// Values the prompt escapes expand to
pub(crate) struct PromptContext {
    pub(crate) user: String,
    pub(crate) host: String,
    pub(crate) cwd: String,
    pub(crate) time: String,
}

impl PromptContext {
    pub(crate) fn current() -> Self {
        PromptContext {
            user: env::var("USER").unwrap_or_default(),
            host: hostname::get()
                .map(|h| h.to_string_lossy().to_string())
                .unwrap_or_default(),
            cwd: env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Render the configured prompt for the current moment
pub(crate) fn render(template: &str) -> String {
    if !template.contains('\\') {
        return template.to_string();
    }
    expand(template, &PromptContext::current())
}

/// Expand `\u`, `\h`, `\w`, `\t` and `\\`; other escapes are kept as typed
pub(crate) fn expand(template: &str, ctx: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => out.push_str(&ctx.user),
            Some('h') => out.push_str(&ctx.host),
            Some('w') => out.push_str(&ctx.cwd),
            Some('t') => out.push_str(&ctx.time),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
