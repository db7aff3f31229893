// Visibility attribute model: platform family x linkage mode x build role.
use std::fmt;

/// How the platform's linker expresses symbol visibility.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlatformFamily {
    /// `__declspec(dllexport)` / `__declspec(dllimport)` pairs.
    Windows,
    /// `[[gnu::visibility("default")]]`; import and export are symmetric.
    Attribute,
}

impl PlatformFamily {
    /// Family of the host this crate was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            PlatformFamily::Windows
        } else {
            PlatformFamily::Attribute
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Linkage {
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildRole {
    /// Compiling the library's own translation units.
    Owning,
    /// Compiling a dependent that references the library's symbols.
    Consuming,
}

/// The closed set of decorations a public symbol declaration can carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolAttr {
    None,
    DllExport,
    DllImport,
    DefaultVisibility,
}

impl SymbolAttr {
    /// Exact C token sequence for this decoration. Empty for `None`.
    pub fn c_decoration(self) -> &'static str {
        match self {
            SymbolAttr::None => "",
            SymbolAttr::DllExport => "__declspec(dllexport)",
            SymbolAttr::DllImport => "__declspec(dllimport)",
            SymbolAttr::DefaultVisibility => "[[gnu::visibility(\"default\")]]",
        }
    }
}

impl fmt::Display for SymbolAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_decoration())
    }
}

/// Decoration for a public symbol under the given build configuration.
///
/// Static linkage emits no decoration at all; the linker resolves symbols by
/// name within the combined image. Dynamic linkage on Windows distinguishes
/// the owning build (export) from consumers (import); attribute platforms use
/// the same default-visibility marker on both sides.
pub fn symbol_attr(platform: PlatformFamily, linkage: Linkage, role: BuildRole) -> SymbolAttr {
    match (linkage, platform, role) {
        (Linkage::Static, _, _) => SymbolAttr::None,
        (Linkage::Dynamic, PlatformFamily::Windows, BuildRole::Owning) => SymbolAttr::DllExport,
        (Linkage::Dynamic, PlatformFamily::Windows, BuildRole::Consuming) => SymbolAttr::DllImport,
        (Linkage::Dynamic, PlatformFamily::Attribute, _) => SymbolAttr::DefaultVisibility,
    }
}
