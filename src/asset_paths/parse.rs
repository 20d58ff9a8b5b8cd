use regex::Regex;

use super::render::AssetResolver;
use crate::models::{AdminLevel, AssetRef, CountryCode};

/// Compiled matchers recognising the two path shapes an [`AssetResolver`] renders.
#[derive(Debug, Clone)]
pub struct AssetPathPattern {
    world_code: String,
    world: Regex,
    versioned: Regex,
}

impl AssetPathPattern {
    /// Build matchers for paths rendered by `resolver`.
    pub fn new(resolver: &AssetResolver) -> Self {
        let base = regex::escape(resolver.base_path());
        let prefix = regex::escape(resolver.world_layer_prefix());

        // Assembled from escaped literals only.
        let world = Regex::new(&format!(r"^{base}/{prefix}(?P<level>[^/]+)$"))
            .expect("invalid world layer regex");
        let versioned =
            Regex::new(&format!(r"^{base}/v(?P<version>[^/]+)/(?P<code>[^/]+)/(?P<level>[^/]+)$"))
                .expect("invalid versioned asset regex");

        Self {
            world_code: resolver.world_code().to_string(),
            world,
            versioned,
        }
    }

    /// Recover the `(code, level, version)` triple from a rendered path.
    ///
    /// Returns `None` for paths outside the catalog or with segments that would fail
    /// validation, so the result always renders back to the same string.
    pub fn parse(&self, path: &str) -> Option<AssetRef> {
        if let Some(captures) = self.world.captures(path) {
            let level: AdminLevel = captures["level"].parse().ok()?;
            return Some(AssetRef {
                code: CountryCode::parse(&self.world_code).ok()?,
                level,
                version: None,
            });
        }

        let captures = self.versioned.captures(path)?;
        let code = CountryCode::parse(&captures["code"]).ok()?;
        if code.as_str() == self.world_code {
            return None;
        }

        Some(AssetRef {
            code,
            level: captures["level"].parse().ok()?,
            version: Some(captures["version"].to_string()),
        })
    }
}

impl AssetResolver {
    /// Parse a catalog path produced by this resolver.
    pub fn parse(&self, path: &str) -> Option<AssetRef> {
        AssetPathPattern::new(self).parse(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_rendered_country_paths() {
        let resolver = AssetResolver::default();
        let asset = resolver.asset_ref("SLE", "ADM3", Some("3_0_0")).unwrap();
        let path = resolver.render(&asset);
        assert_eq!(resolver.parse(&path), Some(asset));
    }

    #[test]
    fn inverts_world_layer_paths() {
        let resolver = AssetResolver::default();
        let parsed = resolver
            .parse("projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM2")
            .expect("world layer should parse");
        assert_eq!(parsed.code.as_str(), "WLD");
        assert_eq!(parsed.level, AdminLevel::Adm2);
        assert_eq!(parsed.version, None);
    }

    #[test]
    fn rejects_foreign_or_malformed_paths() {
        let pattern = AssetPathPattern::new(&AssetResolver::default());
        for path in [
            "projects/other/geoBoundaries/v3_0_0/RWA/ADM1",
            "projects/wri-datalab/geoBoundaries/v3_0_0/rwa/ADM1",
            "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM7",
            "projects/wri-datalab/geoBoundaries/v3_0_0/WLD/ADM0",
            "projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM9",
            "projects/wri-datalab/geoBoundaries/v3_0_0/RWA",
        ] {
            assert_eq!(pattern.parse(path), None, "{path} should not parse");
        }
    }

    #[test]
    fn escapes_regex_characters_in_base_path() {
        let resolver = AssetResolver::new("users/a.b+c/bounds", "1_0");
        assert!(resolver.parse("users/a.b+c/bounds/v1_0/KEN/ADM1").is_some());
        assert!(resolver.parse("users/aXb+c/bounds/v1_0/KEN/ADM1").is_none());
    }
}
