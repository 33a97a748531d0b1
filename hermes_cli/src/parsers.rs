use jiff::{SignedDuration, Span, SpanRelativeTo};

/// Parses a resolution duration given as an ISO 8601 duration ("PT1M30S"),
/// a friendly span ("5m", "1h 30m") or a whole number of seconds.
pub fn parse_resolution_duration(input: &str) -> Result<SignedDuration, String> {
    let input = input.trim();

    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
        .ok_or_else(|| format!("invalid resolution duration '{input}'"))?;

    if duration.is_negative() {
        return Err(format!("resolution duration '{input}' is negative"));
    }

    Ok(duration)
}
