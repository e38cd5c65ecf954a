use std::fmt;
use std::str::FromStr;

/// 조직 단위 기본 커뮤니티 헬스 파일 레포 이름
pub const COMMUNITY_HEALTH_REPO: &str = ".github";

/// `owner/repo` 좌표
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// 같은 owner의 `.github` 레포 (템플릿 폴백 위치)
    pub fn community_health(&self) -> Self {
        Self::new(self.owner.clone(), COMMUNITY_HEALTH_REPO)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => anyhow::bail!("invalid repository {s:?}, expected owner/repo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let r: RepoRef = "org/repo".parse().unwrap();
        assert_eq!(r, RepoRef::new("org", "repo"));
        assert_eq!(r.full_name(), "org/repo");
        assert_eq!(r.community_health().full_name(), "org/.github");
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!("repo".parse::<RepoRef>().is_err());
        assert!("/repo".parse::<RepoRef>().is_err());
        assert!("org/".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }
}
