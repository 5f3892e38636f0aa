//! The media-type matcher: given one offered media type and one `Accept`
//! header value, decide whether the offer is acceptable.
//!
//! Grounded on the matching shape of `angular-rust-ux-webmachine`'s
//! `content_negotiation::mediatype::MediaType` (`main`/`sub` split, `*`
//! wildcards) and `kellymclaughlin-airship-rust`'s `map_accept_media`
//! (iterate the offered list, iterate the Accept entries, look for a
//! match) — simplified to not rank by `q`-value: any entry that matches
//! makes the offer acceptable, full stop.

/// A single parsed media-range from an `Accept` header entry, with its
/// `;q=...` parameters already discarded (parameters after `;` play no
/// part in matching).
struct MediaRange<'a> {
    main: &'a str,
    sub: &'a str,
}

impl<'a> MediaRange<'a> {
    fn parse(entry: &'a str) -> Option<MediaRange<'a>> {
        let without_params = entry.split(';').next()?.trim();
        if without_params.is_empty() {
            return None;
        }
        let mut parts = without_params.splitn(2, '/');
        let main = parts.next()?.trim();
        let sub = parts.next().unwrap_or("").trim();
        if main.is_empty() || sub.is_empty() {
            return None;
        }
        Some(MediaRange { main, sub })
    }

    /// `*/*` matches anything; `type/*` matches any offer whose main type
    /// equals `type`.
    fn matches_offer(&self, offer_main: &str, offer_sub: &str) -> bool {
        if self.main == "*" && self.sub == "*" {
            true
        } else if self.main == offer_main && self.sub == "*" {
            true
        } else {
            self.main == offer_main && self.sub == offer_sub
        }
    }
}

fn split_offer(offer: &str) -> Option<(&str, &str)> {
    let mut parts = offer.splitn(2, '/');
    let main = parts.next()?.trim();
    let sub = parts.next()?.trim();
    if main.is_empty() || sub.is_empty() {
        None
    } else {
        Some((main, sub))
    }
}

/// True iff `offer` (e.g. `"application/json"`) is acceptable against the
/// raw `Accept` header value `accept` (e.g. `"text/html, application/*;q=0.8"`).
///
/// The header is split on `,`, each entry trimmed, exact matches win,
/// `*/*` matches anything, and `type/*` matches any offer of that main
/// type. Any single matching entry is enough.
pub fn is_acceptable(offer: &str, accept: &str) -> bool {
    let (offer_main, offer_sub) = match split_offer(offer) {
        Some(parts) => parts,
        None => return false,
    };

    accept
        .split(',')
        .filter_map(MediaRange::parse)
        .any(|range| range.matches_offer(offer_main, offer_sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(is_acceptable("application/json", "application/json"));
    }

    #[test]
    fn star_star_matches_anything() {
        assert!(is_acceptable("text/html", "*/*"));
    }

    #[test]
    fn type_star_matches_same_main_type() {
        assert!(is_acceptable("application/json", "application/*"));
        assert!(!is_acceptable("text/plain", "application/*"));
    }

    #[test]
    fn no_match() {
        assert!(!is_acceptable("application/json", "text/html"));
    }

    #[test]
    fn multiple_entries_any_may_match() {
        assert!(is_acceptable(
            "application/json",
            "text/html, application/json, text/plain"
        ));
    }

    #[test]
    fn parameters_are_discarded() {
        assert!(is_acceptable("application/json", "application/json;q=0.5"));
    }

    #[test]
    fn entries_are_trimmed() {
        assert!(is_acceptable("application/json", "text/html ,  application/json"));
    }

    #[test]
    fn malformed_offer_never_matches() {
        assert!(!is_acceptable("not-a-media-type", "*/*"));
    }
}
