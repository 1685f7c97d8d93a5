use crate::release_tracking::domain::{Component, RepositoryId};
use std::collections::BTreeMap;
use tracing::warn;

/// Variables a tracked component exports to the test action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvBinding {
    /// The resolved ref (release tag or commit SHA)
    Ref { var: &'static str },
    /// The image URL, plus the manifest digest under a separate variable
    Image {
        image_var: &'static str,
        version_var: &'static str,
    },
}

/// Fixed component -> variable table, keyed by component name or repository
const ENV_TABLE: &[(&str, EnvBinding)] = &[
    (
        "kubernetes-sigs/cluster-api",
        EnvBinding::Ref { var: "CAPI_VERSION" },
    ),
    (
        "metal3-io/cluster-api-provider-metal3",
        EnvBinding::Ref {
            var: "CAPM3_VERSION",
        },
    ),
    (
        "openshift/assisted-service",
        EnvBinding::Image {
            image_var: "ASSISTED_SERVICE_IMAGE",
            version_var: "ASSISTED_SERVICE_VERSION",
        },
    ),
    (
        "openshift/assisted-service-el8",
        EnvBinding::Image {
            image_var: "ASSISTED_SERVICE_EL8_IMAGE",
            version_var: "ASSISTED_SERVICE_EL8_VERSION",
        },
    ),
    (
        "openshift/assisted-image-service",
        EnvBinding::Image {
            image_var: "ASSISTED_IMAGE_SERVICE_IMAGE",
            version_var: "ASSISTED_IMAGE_SERVICE_VERSION",
        },
    ),
    (
        "openshift/assisted-installer-agent",
        EnvBinding::Image {
            image_var: "ASSISTED_INSTALLER_AGENT_IMAGE",
            version_var: "ASSISTED_INSTALLER_AGENT_VERSION",
        },
    ),
    (
        "openshift/assisted-installer-controller",
        EnvBinding::Image {
            image_var: "ASSISTED_INSTALLER_CONTROLLER_IMAGE",
            version_var: "ASSISTED_INSTALLER_CONTROLLER_VERSION",
        },
    ),
    (
        "openshift/assisted-installer",
        EnvBinding::Image {
            image_var: "ASSISTED_INSTALLER_IMAGE",
            version_var: "ASSISTED_INSTALLER_VERSION",
        },
    ),
];

/// Looks up the binding for a component: by name first, then by base repository
pub fn binding_for(component: &Component) -> Option<EnvBinding> {
    lookup(component.name()).or_else(|| {
        RepositoryId::parse(component.repository())
            .ok()
            .and_then(|id| lookup(&id.base()))
    })
}

fn lookup(key: &str) -> Option<EnvBinding> {
    ENV_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, binding)| *binding)
}

/// Environment handed to the test action, built from one snapshot.
///
/// This is a plain map; nothing here touches the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEnvironment {
    variables: BTreeMap<String, String>,
    skipped: Vec<String>,
    overwritten: Vec<String>,
}

impl TestEnvironment {
    pub fn from_components(components: &[Component]) -> Self {
        let mut env = TestEnvironment::default();

        for component in components {
            match binding_for(component) {
                Some(EnvBinding::Ref { var }) => {
                    env.set(component, var, Some(component.git_ref()));
                }
                Some(EnvBinding::Image {
                    image_var,
                    version_var,
                }) => {
                    env.set(component, image_var, component.image_url());
                    env.set(component, version_var, component.image_digest());
                }
                None => env.skipped.push(component.name().to_string()),
            }
        }

        env
    }

    fn set(&mut self, component: &Component, var: &str, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        if let Some(previous) = self.variables.insert(var.to_string(), value.to_string()) {
            if previous != value {
                warn!(
                    variable = var,
                    previous = %previous,
                    value = %value,
                    component = component.name(),
                    "Two components export the same variable; keeping the later one"
                );
                self.overwritten.push(var.to_string());
            }
        }
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Names of components with no table entry
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Variables bound by more than one component
    pub fn overwritten(&self) -> &[String] {
        &self.overwritten
    }

    pub fn into_variables(self) -> BTreeMap<String, String> {
        self.variables
    }
}
