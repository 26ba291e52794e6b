use super::{
    deploy_adapter_step::DeployAdapterStep, deploy_roles_library_step::DeployRolesLibraryStep,
    init_roles_library_step::InitRolesLibraryStep, migration_step::MigrationStep,
    setup_roles_step::SetupRolesStep,
};
use into_trait::IntoTraitObject;
use serde::Deserialize;

#[derive(Deserialize, Debug, IntoTraitObject)]
#[trait_name(MigrationStep)]
pub enum MigrationSteps {
    DeployRolesLibrary(DeployRolesLibraryStep),
    InitRolesLibrary(InitRolesLibraryStep),
    DeployAdapter(DeployAdapterStep),
    SetupRoles(SetupRolesStep),
}

impl MigrationSteps {
    /// The stock migrations 1 through 4 with their default wiring.
    pub fn templates() -> Vec<MigrationSteps> {
        vec![
            MigrationSteps::DeployRolesLibrary(Default::default()),
            MigrationSteps::InitRolesLibrary(Default::default()),
            MigrationSteps::DeployAdapter(Default::default()),
            MigrationSteps::SetupRoles(Default::default()),
        ]
    }
}
