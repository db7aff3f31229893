//! Purpose: Render C headers carrying the conditional export-macro contract.
//! Exports: `CFunction`, `HeaderSpec`, `fixture_headers`.
//! Role: Keep the emitted header and the attribute model from drifting apart.
//! Invariants: Decoration tokens come from `SymbolAttr::c_decoration()` only.
//! Invariants: Rendering is deterministic; same spec yields identical bytes.
use std::fmt::Write as _;

use crate::core::attr::SymbolAttr;
use crate::core::buildenv::LibToken;
use crate::core::error::Error;

const DEFAULT_GUARD_PREFIX: &str = "LINKPROBE";

/// One public C declaration, decorated with `<LIB>_PUBLIC_API` on render.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CFunction {
    pub ret: String,
    pub name: String,
}

impl CFunction {
    pub fn new(ret: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ret: ret.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeaderSpec {
    lib: LibToken,
    guard_prefix: String,
    includes: Vec<String>,
    functions: Vec<CFunction>,
}

impl HeaderSpec {
    pub fn new(lib: &str) -> Result<Self, Error> {
        Ok(Self {
            lib: LibToken::new(lib)?,
            guard_prefix: DEFAULT_GUARD_PREFIX.to_string(),
            includes: Vec::new(),
            functions: Vec::new(),
        })
    }

    pub fn guard_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.guard_prefix = prefix.into();
        self
    }

    /// Dependency header pulled in with angle brackets, e.g. `bar/bar.h`.
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    pub fn function(mut self, function: CFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn lib(&self) -> &LibToken {
        &self.lib
    }

    /// Suggested file name for the rendered header (`bar.h`).
    pub fn file_name(&self) -> String {
        format!("{}.h", self.lib.as_str().to_ascii_lowercase())
    }

    pub fn render(&self) -> String {
        let lib = self.lib.as_str();
        let guard = format!("{}_{}_H", self.guard_prefix, lib);
        let mut out = String::new();

        let _ = writeln!(out, "#ifndef {guard}");
        let _ = writeln!(out, "#define {guard}");
        out.push('\n');

        for include in &self.includes {
            let _ = writeln!(out, "#include <{include}>");
        }
        if !self.includes.is_empty() {
            out.push('\n');
        }

        let _ = writeln!(out, "#ifndef {}", self.lib.static_var());
        let _ = writeln!(out, "    #ifdef _WIN32");
        let _ = writeln!(
            out,
            "        #define {lib}_DLL_EXPORT {}",
            SymbolAttr::DllExport.c_decoration()
        );
        let _ = writeln!(
            out,
            "        #define {lib}_DLL_IMPORT {}",
            SymbolAttr::DllImport.c_decoration()
        );
        let _ = writeln!(out, "    #else");
        let _ = writeln!(
            out,
            "        #define {lib}_DLL_EXPORT {}",
            SymbolAttr::DefaultVisibility.c_decoration()
        );
        let _ = writeln!(
            out,
            "        #define {lib}_DLL_IMPORT {}",
            SymbolAttr::DefaultVisibility.c_decoration()
        );
        let _ = writeln!(out, "    #endif");
        let _ = writeln!(out, "#else");
        let _ = writeln!(out, "    #define {lib}_DLL_EXPORT");
        let _ = writeln!(out, "    #define {lib}_DLL_IMPORT");
        let _ = writeln!(out, "#endif");
        out.push('\n');

        let _ = writeln!(out, "#ifdef {}", self.lib.build_var());
        let _ = writeln!(
            out,
            "    #define {} {lib}_DLL_EXPORT",
            self.lib.public_api_macro()
        );
        let _ = writeln!(out, "#else");
        let _ = writeln!(
            out,
            "    #define {} {lib}_DLL_IMPORT",
            self.lib.public_api_macro()
        );
        let _ = writeln!(out, "#endif");
        out.push('\n');

        for function in &self.functions {
            let _ = writeln!(
                out,
                "{} {} {}();",
                self.lib.public_api_macro(),
                function.ret,
                function.name
            );
        }
        let _ = writeln!(out, "#endif");
        out
    }
}

/// Canonical header specs for the shipped fixture libraries.
pub fn fixture_headers() -> Vec<HeaderSpec> {
    let bar = HeaderSpec::new("bar")
        .expect("bar is a valid token")
        .function(CFunction::new("int", "bar"));
    let foo = HeaderSpec::new("foo")
        .expect("foo is a valid token")
        .function(CFunction::new("int", "foo"));
    let target = HeaderSpec::new("target")
        .expect("target is a valid token")
        .include("bar/bar.h")
        .function(CFunction::new("int", "target"));
    vec![bar, foo, target]
}

/// Look up one canonical fixture header by library token.
pub fn fixture_header(lib: &LibToken) -> Option<HeaderSpec> {
    fixture_headers()
        .into_iter()
        .find(|spec| spec.lib() == lib)
}

#[cfg(test)]
mod tests {
    use super::{CFunction, HeaderSpec, fixture_header, fixture_headers};
    use crate::core::buildenv::LibToken;

    #[test]
    fn bar_header_carries_the_macro_block() {
        let spec = HeaderSpec::new("bar")
            .unwrap()
            .function(CFunction::new("int", "bar"));
        let text = spec.render();

        assert!(text.starts_with("#ifndef LINKPROBE_BAR_H\n#define LINKPROBE_BAR_H\n"));
        assert!(text.contains("#ifndef BAR_STATIC\n"));
        assert!(text.contains("        #define BAR_DLL_EXPORT __declspec(dllexport)\n"));
        assert!(text.contains("        #define BAR_DLL_IMPORT __declspec(dllimport)\n"));
        assert!(
            text.contains("        #define BAR_DLL_EXPORT [[gnu::visibility(\"default\")]]\n")
        );
        assert!(text.contains("#ifdef BAR_BUILD\n"));
        assert!(text.contains("    #define BAR_PUBLIC_API BAR_DLL_EXPORT\n"));
        assert!(text.contains("    #define BAR_PUBLIC_API BAR_DLL_IMPORT\n"));
        assert!(text.contains("BAR_PUBLIC_API int bar();\n"));
        assert!(text.ends_with("#endif\n"));
    }

    #[test]
    fn static_branch_defines_empty_decorations() {
        let text = HeaderSpec::new("foo")
            .unwrap()
            .function(CFunction::new("int", "foo"))
            .render();
        assert!(text.contains("#else\n    #define FOO_DLL_EXPORT\n    #define FOO_DLL_IMPORT\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let spec = HeaderSpec::new("bar")
            .unwrap()
            .function(CFunction::new("int", "bar"));
        assert_eq!(spec.render(), spec.render());
    }

    #[test]
    fn guard_prefix_is_overridable() {
        let text = HeaderSpec::new("bar")
            .unwrap()
            .guard_prefix("MYPROJ")
            .render();
        assert!(text.starts_with("#ifndef MYPROJ_BAR_H\n"));
    }

    #[test]
    fn fixture_set_matches_the_dependency_chain() {
        let specs = fixture_headers();
        let names: Vec<&str> = specs.iter().map(|s| s.lib().as_str()).collect();
        assert_eq!(names, ["BAR", "FOO", "TARGET"]);

        let target = fixture_header(&LibToken::new("target").unwrap()).unwrap();
        let text = target.render();
        assert!(text.contains("#include <bar/bar.h>\n"));
        assert!(text.contains("TARGET_PUBLIC_API int target();\n"));

        let foo = fixture_header(&LibToken::new("foo").unwrap()).unwrap();
        assert!(!foo.render().contains("#include"));
    }

    #[test]
    fn file_name_is_lowercased() {
        let spec = HeaderSpec::new("TARGET").unwrap();
        assert_eq!(spec.file_name(), "target.h");
    }
}
