#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3000"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL, same origin as the static files
}

pub fn contact_endpoint() -> String {
    format!("{}/api/contact", get_backend_url())
}

// Values below are baked in at build time, e.g. `BOOKING_URL=... trunk build`.

pub fn booking_url() -> &'static str {
    option_env!("BOOKING_URL").unwrap_or("#")
}

pub fn telegram_url() -> String {
    format!("https://t.me/{}", option_env!("TELEGRAM_USERNAME").unwrap_or("username"))
}

pub fn skip_preloader_on_repeat_visit() -> bool {
    parse_flag(option_env!("SKIP_PRELOADER_ON_REPEAT_VISIT"))
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
