// Build-configuration surface: maps `<LIB>_STATIC` / `<LIB>_BUILD` defines
// onto the visibility model.
use std::fmt;

use crate::core::attr::{BuildRole, Linkage, PlatformFamily, SymbolAttr, symbol_attr};
use crate::core::error::{Error, ErrorKind};

/// Validated library token, stored uppercase (`BAR`, `FOO`, `TARGET`).
///
/// Lowercase input is accepted and folded so CLI callers can pass the crate
/// name as spelled on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LibToken(String);

impl LibToken {
    pub fn new(raw: &str) -> Result<Self, Error> {
        let folded = raw.to_ascii_uppercase();
        let mut chars = folded.chars();
        let valid = match chars.next() {
            Some(first) => {
                first.is_ascii_uppercase()
                    && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(Error::new(ErrorKind::Usage).with_message(format!(
                "invalid library token {raw:?}: expected [A-Za-z][A-Za-z0-9_]*"
            )));
        }
        Ok(Self(folded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the define selecting static linkage, e.g. `BAR_STATIC`.
    pub fn static_var(&self) -> String {
        format!("{}_STATIC", self.0)
    }

    /// Name of the define marking the owning build, e.g. `BAR_BUILD`.
    pub fn build_var(&self) -> String {
        format!("{}_BUILD", self.0)
    }

    /// Name of the derived per-symbol macro, e.g. `BAR_PUBLIC_API`.
    pub fn public_api_macro(&self) -> String {
        format!("{}_PUBLIC_API", self.0)
    }
}

impl fmt::Display for LibToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Linkage mode and build role resolved from a build configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuildEnv {
    pub linkage: Linkage,
    pub role: BuildRole,
}

impl BuildEnv {
    /// Resolve from a define lookup. Presence alone counts: a build system
    /// that defines `BAR_STATIC` at all has selected static linkage, matching
    /// preprocessor `#ifdef` semantics.
    pub fn resolve(lib: &LibToken, lookup: impl Fn(&str) -> bool) -> Self {
        let linkage = if lookup(&lib.static_var()) {
            Linkage::Static
        } else {
            Linkage::Dynamic
        };
        let role = if lookup(&lib.build_var()) {
            BuildRole::Owning
        } else {
            BuildRole::Consuming
        };
        Self { linkage, role }
    }

    /// Resolve from the process environment.
    pub fn from_process_env(lib: &LibToken) -> Self {
        Self::resolve(lib, |var| std::env::var_os(var).is_some())
    }

    /// Check the one invariant the model cannot enforce at a distance: the
    /// owning build must define `<LIB>_BUILD` and every consumer must not.
    pub fn expect_role(&self, lib: &LibToken, expected: BuildRole) -> Result<(), Error> {
        if self.role == expected {
            return Ok(());
        }
        let message = match expected {
            BuildRole::Owning => format!(
                "compiling {lib} itself but {} is not defined",
                lib.build_var()
            ),
            BuildRole::Consuming => format!(
                "compiling a consumer of {lib} but {} is defined",
                lib.build_var()
            ),
        };
        Err(Error::new(ErrorKind::Usage)
            .with_message(message)
            .with_variable(lib.build_var()))
    }

    pub fn attr(&self, platform: PlatformFamily) -> SymbolAttr {
        symbol_attr(platform, self.linkage, self.role)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{BuildEnv, LibToken};
    use crate::core::attr::{BuildRole, Linkage, PlatformFamily, SymbolAttr};
    use crate::core::error::ErrorKind;

    fn env_of(defined: &[&str]) -> HashSet<String> {
        defined.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn token_folds_and_validates() {
        assert_eq!(LibToken::new("bar").unwrap().as_str(), "BAR");
        assert_eq!(LibToken::new("TARGET").unwrap().as_str(), "TARGET");
        assert_eq!(LibToken::new("my_lib2").unwrap().as_str(), "MY_LIB2");

        for bad in ["", "2lib", "bar-baz", "bar baz", "_bar"] {
            let err = LibToken::new(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Usage, "{bad:?}");
        }
    }

    #[test]
    fn derived_variable_names() {
        let lib = LibToken::new("bar").unwrap();
        assert_eq!(lib.static_var(), "BAR_STATIC");
        assert_eq!(lib.build_var(), "BAR_BUILD");
        assert_eq!(lib.public_api_macro(), "BAR_PUBLIC_API");
    }

    #[test]
    fn absent_defines_mean_dynamic_consumer() {
        let lib = LibToken::new("bar").unwrap();
        let env = env_of(&[]);
        let resolved = BuildEnv::resolve(&lib, |var| env.contains(var));
        assert_eq!(resolved.linkage, Linkage::Dynamic);
        assert_eq!(resolved.role, BuildRole::Consuming);
    }

    #[test]
    fn presence_selects_static_and_owning() {
        let lib = LibToken::new("bar").unwrap();
        let env = env_of(&["BAR_STATIC", "BAR_BUILD"]);
        let resolved = BuildEnv::resolve(&lib, |var| env.contains(var));
        assert_eq!(resolved.linkage, Linkage::Static);
        assert_eq!(resolved.role, BuildRole::Owning);
    }

    #[test]
    fn defines_are_scoped_per_library() {
        let foo = LibToken::new("foo").unwrap();
        let env = env_of(&["BAR_STATIC", "BAR_BUILD"]);
        let resolved = BuildEnv::resolve(&foo, |var| env.contains(var));
        assert_eq!(resolved.linkage, Linkage::Dynamic);
        assert_eq!(resolved.role, BuildRole::Consuming);
    }

    #[test]
    fn role_invariant_names_the_offending_variable() {
        let lib = LibToken::new("bar").unwrap();
        let env = env_of(&["BAR_BUILD"]);
        let resolved = BuildEnv::resolve(&lib, |var| env.contains(var));

        assert!(resolved.expect_role(&lib, BuildRole::Owning).is_ok());
        let err = resolved.expect_role(&lib, BuildRole::Consuming).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.variable(), Some("BAR_BUILD"));
    }

    #[test]
    fn resolved_env_feeds_the_attribute_model() {
        let lib = LibToken::new("bar").unwrap();
        let env = env_of(&["BAR_BUILD"]);
        let resolved = BuildEnv::resolve(&lib, |var| env.contains(var));
        assert_eq!(
            resolved.attr(PlatformFamily::Windows),
            SymbolAttr::DllExport
        );
        assert_eq!(
            resolved.attr(PlatformFamily::Attribute),
            SymbolAttr::DefaultVisibility
        );
    }
}
