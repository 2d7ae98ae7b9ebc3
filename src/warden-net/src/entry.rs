//! Grant token parsing.
//!
//! A token names an address with an optional netmask and an optional port:
//!
//! ```text
//! host
//! host:port
//! address/netmask
//! address/netmask:port
//! [v6]
//! [v6]:port
//! [v6]/netmask:port
//! ```
//!
//! IPv6 addresses carry colons of their own, so they are written in
//! brackets and the port colon is searched only after the closing bracket.
//! Splitting is purely positional and never fails; whether the pieces form
//! a usable rule is decided by the rule builder.

/// A grant token split into its positional pieces.
///
/// An absent or empty port is normalized to `"*"`. An absent netmask is the
/// empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantEntry<'a> {
    pub address: &'a str,
    pub netmask: &'a str,
    pub port: &'a str,
}

impl<'a> GrantEntry<'a> {
    /// Split `token` at the first `]`, `/` and relevant `:`.
    pub fn parse(token: &'a str) -> GrantEntry<'a> {
        let bracket_idx = token.find(']');
        let mask_idx = token.find('/');
        let port_idx = match bracket_idx {
            Some(bracket) => token[bracket..].find(':').map(|idx| bracket + idx),
            None => token.find(':'),
        };

        let address = match bracket_idx {
            Some(bracket) => token.get(1..bracket).or_else(|| token.get(1..)).unwrap_or(""),
            None => match (mask_idx, port_idx) {
                (Some(mask), _) => &token[..mask],
                (None, Some(port)) => &token[..port],
                (None, None) => token,
            },
        };

        let netmask = match mask_idx {
            // A port colon before the slash leaves the netmask running to
            // the end of the token.
            Some(mask) => match port_idx {
                Some(port) if port > mask => &token[mask + 1..port],
                _ => &token[mask + 1..],
            },
            None => "",
        };

        let port = match port_idx {
            Some(port) => &token[port + 1..],
            None => "",
        };
        let port = if port.is_empty() { "*" } else { port };

        GrantEntry { address, netmask, port }
    }
}
