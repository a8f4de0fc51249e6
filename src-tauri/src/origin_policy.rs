use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    Allow,
    OpenExternally,
    Block,
}

fn site_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// Whether `target` belongs to the same site as the content URL: the same
/// origin, or the content host and any of its subdomains.
pub(crate) fn is_same_site(content_url: &Url, target: &Url) -> bool {
    if content_url.origin() == target.origin() {
        return true;
    }
    if !matches!(target.scheme(), "http" | "https") {
        return false;
    }
    match (site_host(content_url), site_host(target)) {
        (Some(content_host), Some(target_host)) => {
            target_host == content_host || target_host.ends_with(&format!(".{content_host}"))
        }
        _ => false,
    }
}

pub(crate) fn decide_navigation(content_url: &Url, target: &Url) -> NavigationDecision {
    match target.scheme() {
        "about" | "data" | "blob" => NavigationDecision::Allow,
        "http" | "https" if is_same_site(content_url, target) => NavigationDecision::Allow,
        "http" | "https" => NavigationDecision::OpenExternally,
        _ => NavigationDecision::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid test url")
    }

    #[test]
    fn same_site_navigation_stays_in_window() {
        let content = url("https://heywalnut.com/");
        for target in [
            "https://heywalnut.com/notes/1",
            "https://www.heywalnut.com/",
            "https://app.heywalnut.com/login",
            "about:blank",
        ] {
            assert_eq!(
                decide_navigation(&content, &url(target)),
                NavigationDecision::Allow,
                "{target}"
            );
        }
    }

    #[test]
    fn foreign_sites_open_externally() {
        let content = url("https://heywalnut.com/");
        assert_eq!(
            decide_navigation(&content, &url("https://github.com/heywalnut")),
            NavigationDecision::OpenExternally
        );
        assert_eq!(
            decide_navigation(&content, &url("https://notheywalnut.com/")),
            NavigationDecision::OpenExternally
        );
    }

    #[test]
    fn unsupported_schemes_are_blocked() {
        let content = url("https://heywalnut.com/");
        assert_eq!(
            decide_navigation(&content, &url("file:///etc/passwd")),
            NavigationDecision::Block
        );
    }

    #[test]
    fn development_origin_includes_port() {
        let content = url("http://localhost:3000/");
        assert_eq!(
            decide_navigation(&content, &url("http://localhost:3000/settings")),
            NavigationDecision::Allow
        );
    }
}
