//! Source hosting service detection
//!
//! Maps an upstream source URL onto a known hosting service so that
//! release archives can be located without guessing at URL layouts.

use url::Url;

/// Hosting service of an upstream repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceHost {
    /// github.com repository
    GitHub { owner: String, repo: String },
    /// Any host without a known archive layout
    Unknown,
}

impl SourceHost {
    /// Recognize the hosting service of a source URL
    pub fn from_url(source_url: &str) -> Self {
        let Ok(url) = Url::parse(source_url) else {
            return SourceHost::Unknown;
        };

        match url.host_str() {
            Some("github.com") | Some("www.github.com") => {
                let mut segments = url
                    .path_segments()
                    .into_iter()
                    .flatten()
                    .filter(|s| !s.is_empty());
                match (segments.next(), segments.next()) {
                    (Some(owner), Some(repo)) => {
                        let repo = repo.strip_suffix(".git").unwrap_or(repo);
                        if repo.is_empty() {
                            return SourceHost::Unknown;
                        }
                        SourceHost::GitHub {
                            owner: owner.to_string(),
                            repo: repo.to_string(),
                        }
                    }
                    _ => SourceHost::Unknown,
                }
            }
            _ => SourceHost::Unknown,
        }
    }

    /// Tarball URL for a tagged release
    pub fn archive_url(&self, version: &str) -> Option<String> {
        match self {
            SourceHost::GitHub { owner, repo } => Some(format!(
                "https://github.com/{}/{}/archive/{}.tar.gz",
                owner, repo, version
            )),
            SourceHost::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_url() {
        let host = SourceHost::from_url("https://github.com/org/repo");
        assert_eq!(
            host,
            SourceHost::GitHub {
                owner: "org".to_string(),
                repo: "repo".to_string()
            }
        );
        assert_eq!(
            host.archive_url("2.0.0"),
            Some("https://github.com/org/repo/archive/2.0.0.tar.gz".to_string())
        );
    }

    #[test]
    fn test_github_url_strips_git_suffix() {
        let host = SourceHost::from_url("https://github.com/ros/ros_comm.git");
        assert_eq!(
            host.archive_url("1.14.3"),
            Some("https://github.com/ros/ros_comm/archive/1.14.3.tar.gz".to_string())
        );
    }

    #[test]
    fn test_github_url_with_trailing_path() {
        let host = SourceHost::from_url("https://github.com/ros/geometry2/tree/melodic-devel");
        assert!(matches!(
            host,
            SourceHost::GitHub { ref owner, ref repo } if owner == "ros" && repo == "geometry2"
        ));
    }

    #[test]
    fn test_unknown_hosts() {
        for url in [
            "https://gitlab.com/org/repo.git",
            "https://bitbucket.org/org/repo",
            "https://example.com/github.com/org/repo",
            "not a url",
            "https://github.com/org",
        ] {
            let host = SourceHost::from_url(url);
            assert_eq!(host, SourceHost::Unknown, "{}", url);
            assert_eq!(host.archive_url("1.0.0"), None);
        }
    }
}
