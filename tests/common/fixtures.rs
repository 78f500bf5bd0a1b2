//! Management models used across the integration tests

use super::model::ManagementModel;
use serde_json::json;

pub const AUTHORIZATION: &str = "/core-service=management/access=authorization";

pub const STANDARD_ROLES: [&str; 7] = [
    "Administrator",
    "Auditor",
    "Deployer",
    "Maintainer",
    "Monitor",
    "Operator",
    "SuperUser",
];

/// Path of a resource below the authorization subtree
pub fn authorization(path: &str) -> String {
    format!("{}/{}", AUTHORIZATION, path)
}

/// Authorization subtree shared by the standalone and the domain model
fn with_access_control(model: ManagementModel) -> ManagementModel {
    model
        .with(
            AUTHORIZATION,
            json!({"provider": "rbac", "standard-role-names": STANDARD_ROLES}),
        )
        .with(&authorization("role-mapping=SuperUser"), json!({"include-all": false}))
        .with(
            &authorization("role-mapping=SuperUser/include=user-$local"),
            json!({"name": "$local", "type": "USER"}),
        )
        .with(
            &authorization("role-mapping=SuperUser/include=user-admin"),
            json!({"name": "admin", "type": "USER"}),
        )
        .with(&authorization("role-mapping=Monitor"), json!({"include-all": true}))
        .with(
            &authorization("role-mapping=Monitor/include=group-devs@LDAP"),
            json!({"name": "devs", "type": "GROUP", "realm": "LDAP"}),
        )
        .with(
            &authorization("role-mapping=Monitor/exclude=user-guest"),
            json!({"name": "guest", "type": "USER"}),
        )
}

/// A standalone server with RBAC enabled
pub fn standalone_model() -> ManagementModel {
    with_access_control(ManagementModel::new())
}

/// A domain with two hosts and two server groups
///
/// `master` is the domain controller and runs `server-one`; `server-two` is
/// stopped. `slave` runs `server-three`.
pub fn domain_model() -> ManagementModel {
    with_access_control(ManagementModel::new())
        .with(
            &authorization("host-scoped-role=master-monitor"),
            json!({"base-role": "Monitor", "hosts": ["master"]}),
        )
        .with(
            &authorization("role-mapping=master-monitor"),
            json!({"include-all": false}),
        )
        .with(
            &authorization("role-mapping=master-monitor/include=user-admin"),
            json!({"name": "admin", "type": "USER"}),
        )
        .with(
            &authorization("server-group-scoped-role=main-deployer"),
            json!({"base-role": "Deployer", "server-groups": ["main-server-group"]}),
        )
        .with(
            "/server-group=main-server-group",
            json!({"profile": "full", "socket-binding-group": "full-sockets"}),
        )
        .with(
            "/server-group=other-server-group",
            json!({"profile": "default", "socket-binding-group": "standard-sockets"}),
        )
        .with("/host=slave", json!({"master": false, "host-state": "running"}))
        .with(
            "/host=slave/server-config=server-three",
            json!({"group": "main-server-group", "status": "STARTED"}),
        )
        .with(
            "/host=slave/server=server-three",
            json!({
                "server-group": "main-server-group",
                "server-state": "running",
                "suspend-state": "RUNNING",
                "running-mode": "NORMAL"
            }),
        )
        .with("/host=master", json!({"master": true, "host-state": "running"}))
        .with(
            "/host=master/server-config=server-one",
            json!({"group": "main-server-group", "status": "STARTED"}),
        )
        .with(
            "/host=master/server=server-one",
            json!({
                "server-group": "main-server-group",
                "server-state": "reload-required",
                "suspend-state": "RUNNING",
                "running-mode": "NORMAL"
            }),
        )
        .with(
            "/host=master/server-config=server-two",
            json!({"group": "other-server-group", "status": "STOPPED"}),
        )
}
