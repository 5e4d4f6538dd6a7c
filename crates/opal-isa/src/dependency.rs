//! Dependency descriptors for modules and external libraries
//!
//! An application or shared module declares its dependencies in its
//! configuration. Four sources exist for modules: a local folder, a
//! remote Git repository, the central registry (with a semantic
//! version) and the runtime itself. External native libraries use the
//! same sources except that the runtime source is replaced by the
//! operating system's library path.
//!
//! Local and remote dependencies carry no version information, so they
//! are only meant for development; a module published to the registry
//! must not contain them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name under which a module refers to itself.
///
/// The assembler adds a dependency of type `ModuleDependency::Module`
/// under this name to object files so the linker can resolve imports
/// between submodules of the same module. It cannot appear in user
/// configuration.
pub const SELF_REFERENCE_MODULE_NAME: &str = "module";

/// Source kind of a dependent shared module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ModuleDependencyType {
    /// A folder on the local file system.
    Local = 0x0,
    /// A Git repository pinned to a commit or tag.
    Remote,
    /// The central registry, selected by semantic version.
    Share,
    /// A module bundled with the runtime edition.
    Runtime,
    /// The current module itself; object files only.
    Module,
}

/// Source kind of a dependent external (native) library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExternalLibraryDependencyType {
    /// A shared object file on the local file system.
    Local = 0x0,
    /// A Git repository pinned to a commit or tag.
    Remote,
    /// The central registry, selected by semantic version.
    Share,
    /// A library found through the system loader by soname.
    System,
}

impl fmt::Display for ModuleDependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleDependencyType::Local => "local",
            ModuleDependencyType::Remote => "remote",
            ModuleDependencyType::Share => "share",
            ModuleDependencyType::Runtime => "runtime",
            ModuleDependencyType::Module => "module",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ExternalLibraryDependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExternalLibraryDependencyType::Local => "local",
            ExternalLibraryDependencyType::Remote => "remote",
            ExternalLibraryDependencyType::Share => "share",
            ExternalLibraryDependencyType::System => "system",
        };
        f.write_str(name)
    }
}

/// Declared dependency on a shared module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "module")]
pub enum ModuleDependency {
    #[serde(rename = "local")]
    Local(Box<DependencyLocal>),

    #[serde(rename = "remote")]
    Remote(Box<DependencyRemote>),

    #[serde(rename = "share")]
    Share(Box<DependencyShare>),

    #[serde(rename = "runtime")]
    Runtime,

    #[serde(rename = "module")]
    Module,
}

impl ModuleDependency {
    pub fn dependency_type(&self) -> ModuleDependencyType {
        match self {
            ModuleDependency::Local(_) => ModuleDependencyType::Local,
            ModuleDependency::Remote(_) => ModuleDependencyType::Remote,
            ModuleDependency::Share(_) => ModuleDependencyType::Share,
            ModuleDependency::Runtime => ModuleDependencyType::Runtime,
            ModuleDependency::Module => ModuleDependencyType::Module,
        }
    }
}

/// Declared dependency on an external native library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "library")]
pub enum ExternalLibraryDependency {
    #[serde(rename = "local")]
    Local(Box<DependencyLocal>),

    #[serde(rename = "remote")]
    Remote(Box<DependencyRemote>),

    #[serde(rename = "share")]
    Share(Box<DependencyShare>),

    /// The soname of the library, e.g. "libz.so.1".
    #[serde(rename = "system")]
    System(String),
}

impl ExternalLibraryDependency {
    pub fn dependency_type(&self) -> ExternalLibraryDependencyType {
        match self {
            ExternalLibraryDependency::Local(_) => ExternalLibraryDependencyType::Local,
            ExternalLibraryDependency::Remote(_) => ExternalLibraryDependencyType::Remote,
            ExternalLibraryDependency::Share(_) => ExternalLibraryDependencyType::Share,
            ExternalLibraryDependency::System(_) => ExternalLibraryDependencyType::System,
        }
    }
}

/// Dependency on the local file system.
///
/// For a module the path names the project folder; for an external
/// library it names the shared object file. The path is relative to the
/// depending project's folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "local")]
pub struct DependencyLocal {
    pub path: String,

    #[serde(default)]
    pub parameters: HashMap<String, ParameterValue>,

    #[serde(default)]
    pub condition: DependencyCondition,
}

/// Dependency on a Git repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "remote")]
pub struct DependencyRemote {
    /// Repository URL, "https" protocol.
    pub url: String,

    /// Commit hash or tag.
    pub revision: String,

    #[serde(default)]
    pub parameters: HashMap<String, ParameterValue>,

    #[serde(default)]
    pub condition: DependencyCondition,
}

/// Dependency on the central registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "share")]
pub struct DependencyShare {
    /// Semantic version, e.g. "1.0.1".
    pub version: String,

    #[serde(default)]
    pub parameters: HashMap<String, ParameterValue>,

    #[serde(default)]
    pub condition: DependencyCondition,
}

/// Value passed to a dependency as a build parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "param")]
pub enum ParameterValue {
    #[serde(rename = "string")]
    String(String),

    #[serde(rename = "number")]
    Number(i64),

    #[serde(rename = "bool")]
    Bool(bool),

    /// Forward the value of a property of the depending project.
    #[serde(rename = "prop")]
    Prop(String),

    /// Evaluate an expression at configuration time.
    #[serde(rename = "eval")]
    Eval(String),
}

/// Condition under which a dependency is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "cond")]
pub enum DependencyCondition {
    #[default]
    #[serde(rename = "true")]
    True,

    #[serde(rename = "false")]
    False,

    /// Enabled when the named property or constant is true.
    #[serde(rename = "is_true")]
    IsTrue(String),

    /// Enabled when the named property or constant is false.
    #[serde(rename = "is_false")]
    IsFalse(String),

    /// Enabled when the expression evaluates to true.
    #[serde(rename = "eval")]
    Eval(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_serialize_module_dependency() {
        let local = ModuleDependency::Local(Box::new(DependencyLocal {
            path: "~/projects/helloworld".to_owned(),
            parameters: HashMap::default(),
            condition: DependencyCondition::True,
        }));
        assert_eq!(
            serde_json::to_string(&local).unwrap(),
            r#"{"local":{"path":"~/projects/helloworld","parameters":{},"condition":"true"}}"#
        );

        let remote = ModuleDependency::Remote(Box::new(DependencyRemote {
            url: "https://git.example.com/opal-module.git".to_owned(),
            revision: "v1.0.0".to_owned(),
            parameters: HashMap::default(),
            condition: DependencyCondition::False,
        }));
        assert_eq!(
            serde_json::to_string(&remote).unwrap(),
            r#"{"remote":{"url":"https://git.example.com/opal-module.git","revision":"v1.0.0","parameters":{},"condition":"false"}}"#
        );

        let share = ModuleDependency::Share(Box::new(DependencyShare {
            version: "2.3.0".to_owned(),
            parameters: HashMap::default(),
            condition: DependencyCondition::IsTrue("enable_abc".to_owned()),
        }));
        assert_eq!(
            serde_json::to_string(&share).unwrap(),
            r#"{"share":{"version":"2.3.0","parameters":{},"condition":{"is_true":"enable_abc"}}}"#
        );

        assert_eq!(
            serde_json::to_string(&ModuleDependency::Runtime).unwrap(),
            r#""runtime""#
        );
    }

    #[test]
    fn test_deserialize_library_dependency() {
        // omitted fields take their defaults
        let local: ExternalLibraryDependency = serde_json::from_str(
            r#"{"local":{"path":"~/projects/helloworld/libabc.so.1"}}"#,
        )
        .unwrap();
        assert_eq!(
            local,
            ExternalLibraryDependency::Local(Box::new(DependencyLocal {
                path: "~/projects/helloworld/libabc.so.1".to_owned(),
                parameters: HashMap::default(),
                condition: DependencyCondition::True,
            }))
        );

        let remote: ExternalLibraryDependency = serde_json::from_str(
            r#"{"remote":{"url":"https://git.example.com/liblz4.git","revision":"v1.0.0","condition":"false"}}"#,
        )
        .unwrap();
        assert_eq!(
            remote,
            ExternalLibraryDependency::Remote(Box::new(DependencyRemote {
                url: "https://git.example.com/liblz4.git".to_owned(),
                revision: "v1.0.0".to_owned(),
                parameters: HashMap::default(),
                condition: DependencyCondition::False,
            }))
        );

        let share: ExternalLibraryDependency = serde_json::from_str(
            r#"{"share":{"version":"2.3.0","condition":{"eval":"enable_abc && enable_xyz"}}}"#,
        )
        .unwrap();
        assert_eq!(
            share,
            ExternalLibraryDependency::Share(Box::new(DependencyShare {
                version: "2.3.0".to_owned(),
                parameters: HashMap::default(),
                condition: DependencyCondition::Eval("enable_abc && enable_xyz".to_owned()),
            }))
        );

        let system: ExternalLibraryDependency =
            serde_json::from_str(r#"{"system":"liblz4.so.1"}"#).unwrap();
        assert_eq!(
            system,
            ExternalLibraryDependency::System("liblz4.so.1".to_owned())
        );
    }

    #[test]
    fn test_dependency_types() {
        assert_eq!(
            ModuleDependency::Runtime.dependency_type(),
            ModuleDependencyType::Runtime
        );
        assert_eq!(
            ExternalLibraryDependency::System("libz.so.1".to_owned()).dependency_type(),
            ExternalLibraryDependencyType::System
        );
        assert_eq!(ModuleDependencyType::Module.to_string(), "module");
        assert_eq!(ExternalLibraryDependencyType::System.to_string(), "system");
    }
}
