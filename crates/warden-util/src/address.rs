//! Game server address parsing

/// Port used when an address does not name one
pub const DEFAULT_GAME_PORT: u16 = 25565;

/// Split `host[:port]` into its parts, defaulting the port.
///
/// Bracketed IPv6 literals (`[::1]:25565`) are accepted; a bare IPv6
/// literal is taken as a host without port.
pub fn split_address(address: &str) -> Result<(String, u16), String> {
    let address = address.trim();
    if address.is_empty() {
        return Err("address is empty".into());
    }

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| format!("unterminated '[' in '{address}'"))?;
        let port = match tail {
            "" => DEFAULT_GAME_PORT,
            _ => {
                let port = tail
                    .strip_prefix(':')
                    .ok_or_else(|| format!("unexpected '{tail}' after ']'"))?;
                parse_port(port)?
            }
        };
        return Ok((host.to_string(), port));
    }

    match address.rsplit_once(':') {
        Some((host, _)) if host.contains(':') => Ok((address.to_string(), DEFAULT_GAME_PORT)),
        Some((host, port)) if !host.is_empty() => Ok((host.to_string(), parse_port(port)?)),
        Some(_) => Err(format!("missing host in '{address}'")),
        None => Ok((address.to_string(), DEFAULT_GAME_PORT)),
    }
}

fn parse_port(port: &str) -> Result<u16, String> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("invalid port '{port}'")),
        Ok(p) => Ok(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_only_uses_default_port() {
        assert_eq!(
            split_address("mc.example.org").unwrap(),
            ("mc.example.org".to_string(), DEFAULT_GAME_PORT)
        );
    }

    #[test]
    fn explicit_port() {
        assert_eq!(
            split_address("10.0.0.5:25570").unwrap(),
            ("10.0.0.5".to_string(), 25570)
        );
    }

    #[test]
    fn ipv6_forms() {
        assert_eq!(split_address("[::1]:1234").unwrap(), ("::1".to_string(), 1234));
        assert_eq!(split_address("[::1]").unwrap(), ("::1".to_string(), DEFAULT_GAME_PORT));
        assert_eq!(split_address("fe80::1").unwrap(), ("fe80::1".to_string(), DEFAULT_GAME_PORT));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(split_address("").is_err());
        assert!(split_address("host:notaport").is_err());
        assert!(split_address("host:0").is_err());
        assert!(split_address(":25565").is_err());
        assert!(split_address("[::1").is_err());
    }
}
