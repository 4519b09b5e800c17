//! Built-in descriptor for the Cura slicer GUI.

use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::{
    BuildRequirement, DependencyRequirement, PackageDescriptor, ToolchainVariable, VariableSource,
};
use crate::options::OptionDomain;

pub const PYTHON_VERSION_OPTION: &str = "python_version";
pub const ENTERPRISE_OPTION: &str = "enterprise";
pub const STAGING_OPTION: &str = "staging";

/// Metadata key through which Uranium exposes its CMake module directory.
pub const URANIUM_CMAKE_PATH: &str = "URANIUM_CMAKE_PATH";

const CURA_VERSION: &str = "4.10.0";
const OWNER: &str = "ultimaker";
const CHANNEL: &str = "testing";

/// Companion libraries, in declaration order.
const COMPANIONS: [&str; 4] = ["Charon", "pynest2d", "Savitar", "Uranium"];

/// The Cura package descriptor.
pub fn cura_descriptor() -> PackageDescriptor {
    let options = BTreeMap::from([
        (PYTHON_VERSION_OPTION.to_string(), OptionDomain::Any),
        (ENTERPRISE_OPTION.to_string(), OptionDomain::Boolean),
        (STAGING_OPTION.to_string(), OptionDomain::Boolean),
    ]);

    let default_options = BTreeMap::from([
        (PYTHON_VERSION_OPTION.to_string(), "3.9".to_string()),
        (ENTERPRISE_OPTION.to_string(), "false".to_string()),
        (STAGING_OPTION.to_string(), "false".to_string()),
    ]);

    let dependencies = COMPANIONS
        .iter()
        .map(|name| DependencyRequirement::new(*name, CURA_VERSION, OWNER, CHANNEL))
        .collect();

    let option_propagation = COMPANIONS
        .iter()
        .map(|name| ((*name).to_string(), vec![PYTHON_VERSION_OPTION.to_string()]))
        .collect();

    let dependency_metadata = BTreeMap::from([(
        "Uranium".to_string(),
        BTreeSet::from([URANIUM_CMAKE_PATH.to_string()]),
    )]);

    let toolchain_variables = vec![
        ToolchainVariable {
            name: "Python_VERSION".to_string(),
            source: VariableSource::Option(PYTHON_VERSION_OPTION.to_string()),
        },
        ToolchainVariable {
            name: URANIUM_CMAKE_PATH.to_string(),
            source: VariableSource::DependencyMetadata {
                dependency: "Uranium".to_string(),
                key: URANIUM_CMAKE_PATH.to_string(),
            },
        },
    ];

    PackageDescriptor {
        name: "Cura".to_string(),
        version: CURA_VERSION.to_string(),
        license: "LGPL-3.0".to_string(),
        author: "Ultimaker B.V.".to_string(),
        url: "https://github.com/Ultimaker/cura".to_string(),
        description: "3D printer / slicing GUI built on top of the Uranium framework".to_string(),
        topics: [
            "conan", "python", "pyqt5", "qt", "qml", "3d-printing", "slicer",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        options,
        default_options,
        dependencies,
        build_requirements: vec![BuildRequirement {
            name: "cmake".to_string(),
            version: "[>=3.16.2]".to_string(),
        }],
        option_propagation,
        dependency_metadata,
        toolchain_variables,
    }
}
