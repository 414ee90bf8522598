// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use lb_reconciler::domain::model::*;
use lb_reconciler::domain::reconciler::{
    locate_load_balancer_id, resolve_status, LoadBalancerReconciler, Observed, WaitSettings,
};
use lb_reconciler::{LbError, LockRegistry};
use std::sync::Arc;
use std::time::Duration;

mod test_utils {
    use super::*;
    use lb_reconciler::infrastructure::openstack::{BackendKind, LoadBalancerBackend};
    use lb_reconciler::Result;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Scripted in-memory backend. Each status-tree queue pops one snapshot
    /// per call and keeps repeating its last one.
    #[derive(Default)]
    pub struct FakeBackend {
        pub state: Mutex<FakeState>,
    }

    #[derive(Default)]
    pub struct FakeState {
        pub trees: HashMap<String, VecDeque<StatusTree>>,
        pub lb_statuses: HashMap<String, VecDeque<ProvisioningStatus>>,
        pub objects: HashMap<ResourceKey, ResourceObject>,
        pub load_balancers: Vec<LoadBalancer>,
        pub create_errors: VecDeque<LbError>,
        pub create_result: Option<ResourceObject>,
        pub after_create: Option<(String, Vec<StatusTree>)>,
        pub delete_errors: VecDeque<LbError>,
        pub after_delete: Option<(String, Vec<StatusTree>)>,
        pub calls: Vec<String>,
    }

    fn next<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script_trees(&self, lb_id: &str, trees: Vec<StatusTree>) {
            let mut state = self.state.lock().unwrap();
            state.trees.insert(lb_id.to_string(), trees.into());
        }

        pub fn script_lb_statuses(&self, lb_id: &str, statuses: Vec<ProvisioningStatus>) {
            let mut state = self.state.lock().unwrap();
            state.lb_statuses.insert(lb_id.to_string(), statuses.into());
        }

        pub fn insert(&self, object: ResourceObject) {
            let mut state = self.state.lock().unwrap();
            if let ResourceObject::LoadBalancer(lb) = &object {
                state.load_balancers.push(lb.clone());
            }
            state.objects.insert(object.key(), object);
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls().iter().filter(|c| c.starts_with(prefix)).count()
        }
    }

    #[async_trait::async_trait]
    impl LoadBalancerBackend for FakeBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Octavia
        }

        async fn status_tree(&self, lb_id: &str) -> Result<StatusTree> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("status_tree:{}", lb_id));
            state
                .trees
                .get_mut(lb_id)
                .and_then(next)
                .ok_or_else(|| LbError::not_found("loadbalancer", lb_id))
        }

        async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("list".to_string());
            Ok(state.load_balancers.clone())
        }

        async fn fetch(&self, key: &ResourceKey) -> Result<ResourceObject> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("fetch:{}:{}", key.kind, key.id));
            if key.kind == ResourceKind::LoadBalancer {
                if let Some(status) = state.lb_statuses.get_mut(&key.id).and_then(next) {
                    return Ok(ResourceObject::LoadBalancer(LoadBalancer {
                        id: key.id.clone(),
                        provisioning_status: status,
                        ..Default::default()
                    }));
                }
            }
            state
                .objects
                .get(key)
                .cloned()
                .ok_or_else(|| LbError::not_found(key.kind.as_str(), &key.id))
        }

        async fn create(&self, spec: &ResourceSpec) -> Result<ResourceObject> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("create:{}", spec.kind()));
            if let Some(err) = state.create_errors.pop_front() {
                return Err(err);
            }
            let created = state
                .create_result
                .clone()
                .ok_or_else(|| LbError::Api {
                    status: 500,
                    message: "no scripted create result".to_string(),
                })?;
            if let Some((lb_id, trees)) = state.after_create.take() {
                state.trees.insert(lb_id, trees.into());
            }
            state.objects.insert(created.key(), created.clone());
            Ok(created)
        }

        async fn update(&self, key: &ResourceKey, _spec: &ResourceSpec) -> Result<ResourceObject> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("update:{}:{}", key.kind, key.id));
            state
                .objects
                .get(key)
                .cloned()
                .ok_or_else(|| LbError::not_found(key.kind.as_str(), &key.id))
        }

        async fn delete(&self, key: &ResourceKey) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("delete:{}:{}", key.kind, key.id));
            if let Some((lb_id, trees)) = state.after_delete.take() {
                state.trees.insert(lb_id, trees.into());
            }
            let removed = state.objects.remove(key);
            if let Some(err) = state.delete_errors.pop_front() {
                return Err(err);
            }
            removed
                .map(|_| ())
                .ok_or_else(|| LbError::not_found(key.kind.as_str(), &key.id))
        }
    }

    pub fn settings() -> WaitSettings {
        WaitSettings {
            timeout: Duration::from_secs(60),
            delay: Duration::from_secs(1),
            min_interval: Duration::from_secs(1),
            retry_interval: Duration::from_secs(1),
        }
    }

    pub fn reconciler(backend: &Arc<FakeBackend>) -> LoadBalancerReconciler {
        LoadBalancerReconciler::new(backend.clone(), settings())
    }

    pub fn lb_tree(
        lb_id: &str,
        status: ProvisioningStatus,
        listeners: Vec<ListenerStatus>,
        pools: Vec<PoolStatus>,
    ) -> StatusTree {
        StatusTree {
            loadbalancer: LoadBalancerStatus {
                id: lb_id.to_string(),
                provisioning_status: status,
                listeners,
                pools,
                ..Default::default()
            },
        }
    }

    pub fn listener_status(
        id: &str,
        status: ProvisioningStatus,
        pools: Vec<PoolStatus>,
        l7policies: Vec<L7PolicyStatus>,
    ) -> ListenerStatus {
        ListenerStatus {
            id: id.to_string(),
            provisioning_status: status,
            pools,
            l7policies,
            ..Default::default()
        }
    }

    pub fn pool_status(id: &str, status: ProvisioningStatus, members: Vec<MemberStatus>) -> PoolStatus {
        PoolStatus {
            id: id.to_string(),
            provisioning_status: status,
            members,
            ..Default::default()
        }
    }

    pub fn member_status(id: &str, status: ProvisioningStatus) -> MemberStatus {
        MemberStatus {
            id: id.to_string(),
            provisioning_status: status,
            ..Default::default()
        }
    }

    pub fn policy_status(id: &str, status: ProvisioningStatus) -> L7PolicyStatus {
        L7PolicyStatus {
            id: id.to_string(),
            provisioning_status: status,
            ..Default::default()
        }
    }

    pub fn listener(id: &str, lb_id: &str) -> Listener {
        Listener {
            id: id.to_string(),
            loadbalancers: vec![IdRef::new(lb_id)],
            provisioning_status: ProvisioningStatus::Active,
            ..Default::default()
        }
    }

    pub fn pool(id: &str, lb_id: Option<&str>, listener_id: Option<&str>) -> Pool {
        Pool {
            id: id.to_string(),
            loadbalancers: lb_id.map(IdRef::new).into_iter().collect(),
            listeners: listener_id.map(IdRef::new).into_iter().collect(),
            provisioning_status: ProvisioningStatus::Active,
            ..Default::default()
        }
    }
}

use test_utils::*;
use lb_reconciler::domain::model::ProvisioningStatus::{
    Active, PendingCreate, PendingDelete, PendingUpdate,
};

// ============================================================================
// Status resolver
// ============================================================================

#[tokio::test]
async fn test_resolve_pending_root_masks_children() {
    let backend = FakeBackend::new();
    let tree = lb_tree(
        "lb-1",
        PendingUpdate,
        vec![listener_status("l-1", Active, vec![], vec![])],
        vec![],
    );

    let key = ResourceKey::new(ResourceKind::Listener, "l-1");
    let observation = resolve_status(&backend, &tree, &key).await.unwrap();

    assert_eq!(observation.status, PendingUpdate);
    assert!(matches!(
        observation.object,
        Observed::Node(TreeNode::LoadBalancer(_))
    ));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_resolve_settled_root_returns_child_status() {
    let backend = FakeBackend::new();
    let tree = lb_tree(
        "lb-1",
        Active,
        vec![listener_status(
            "l-1",
            Active,
            vec![pool_status("p-1", PendingCreate, vec![])],
            vec![],
        )],
        vec![],
    );

    let key = ResourceKey::new(ResourceKind::Pool, "p-1");
    let observation = resolve_status(&backend, &tree, &key).await.unwrap();

    assert_eq!(observation.status, PendingCreate);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_resolve_member_matches_parent_pool() {
    let backend = FakeBackend::new();
    let tree = lb_tree(
        "lb-1",
        Active,
        vec![],
        vec![
            pool_status("p-1", Active, vec![member_status("m-1", Active)]),
            pool_status("p-2", Active, vec![member_status("m-1", PendingUpdate)]),
        ],
    );

    let observation = resolve_status(&backend, &tree, &ResourceKey::member("p-2", "m-1"))
        .await
        .unwrap();
    assert_eq!(observation.status, PendingUpdate);
}

#[tokio::test]
async fn test_resolve_absent_child_falls_back_to_get() {
    let backend = FakeBackend::new();
    backend.insert(ResourceObject::Pool(Pool {
        provisioning_status: PendingCreate,
        ..pool("p-9", Some("lb-1"), None)
    }));
    let tree = lb_tree("lb-1", Active, vec![], vec![]);

    let key = ResourceKey::new(ResourceKind::Pool, "p-9");
    let observation = resolve_status(&backend, &tree, &key).await.unwrap();

    // Silence in a settled tree plus a successful GET reads as ACTIVE.
    assert_eq!(observation.status, Active);
    assert!(matches!(observation.object, Observed::Fetched(ResourceObject::Pool(_))));
    assert_eq!(backend.calls(), vec!["fetch:pool:p-9".to_string()]);
}

#[tokio::test]
async fn test_resolve_absent_child_not_found_is_distinguishable() {
    let backend = FakeBackend::new();
    let tree = lb_tree("lb-1", Active, vec![], vec![]);

    let err = resolve_status(&backend, &tree, &ResourceKey::member("p-1", "m-1"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Resource locator
// ============================================================================

#[tokio::test]
async fn test_locate_pool_with_direct_reference() {
    let backend = FakeBackend::new();
    let object = ResourceObject::Pool(pool("p-1", Some("lb-1"), Some("l-1")));

    let lb_id = locate_load_balancer_id(&backend, &object).await.unwrap();
    assert_eq!(lb_id, "lb-1");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_locate_pool_through_listener() {
    let backend = FakeBackend::new();
    backend.insert(ResourceObject::Listener(listener("l-1", "lb-7")));
    let object = ResourceObject::Pool(pool("p-1", None, Some("l-1")));

    let lb_id = locate_load_balancer_id(&backend, &object).await.unwrap();
    assert_eq!(lb_id, "lb-7");
    assert_eq!(backend.calls(), vec!["fetch:listener:l-1".to_string()]);
}

#[tokio::test]
async fn test_locate_member_through_parent_pool() {
    let backend = FakeBackend::new();
    backend.insert(ResourceObject::Pool(pool("p-1", Some("lb-3"), None)));
    let object = ResourceObject::Member(Member {
        id: "m-1".to_string(),
        pool_id: Some("p-1".to_string()),
        ..Default::default()
    });

    assert_eq!(locate_load_balancer_id(&backend, &object).await.unwrap(), "lb-3");
    assert_eq!(backend.count("list"), 0);
}

#[tokio::test]
async fn test_locate_policy_by_enumeration() {
    let backend = FakeBackend::new();
    for id in ["lb-1", "lb-2", "lb-3"] {
        backend.insert(ResourceObject::LoadBalancer(LoadBalancer {
            id: id.to_string(),
            ..Default::default()
        }));
    }
    backend.script_trees("lb-1", vec![lb_tree("lb-1", Active, vec![], vec![])]);
    backend.script_trees(
        "lb-2",
        vec![lb_tree(
            "lb-2",
            Active,
            vec![listener_status(
                "l-2",
                Active,
                vec![],
                vec![policy_status("pol-1", Active)],
            )],
            vec![],
        )],
    );
    backend.script_trees("lb-3", vec![lb_tree("lb-3", Active, vec![], vec![])]);

    let object = ResourceObject::L7Policy(L7Policy {
        id: "pol-1".to_string(),
        ..Default::default()
    });
    assert_eq!(locate_load_balancer_id(&backend, &object).await.unwrap(), "lb-2");
    assert_eq!(backend.count("list"), 1);
}

#[tokio::test]
async fn test_locate_policy_skips_load_balancer_without_tree() {
    let backend = FakeBackend::new();
    for id in ["lb-gone", "lb-2"] {
        backend.insert(ResourceObject::LoadBalancer(LoadBalancer {
            id: id.to_string(),
            ..Default::default()
        }));
    }
    // lb-gone is listed but its status tree 404s.
    backend.script_trees(
        "lb-2",
        vec![lb_tree(
            "lb-2",
            Active,
            vec![listener_status(
                "l-2",
                Active,
                vec![],
                vec![policy_status("pol-1", Active)],
            )],
            vec![],
        )],
    );

    let object = ResourceObject::L7Policy(L7Policy {
        id: "pol-1".to_string(),
        ..Default::default()
    });
    assert_eq!(locate_load_balancer_id(&backend, &object).await.unwrap(), "lb-2");
}

#[tokio::test]
async fn test_locate_policy_enumeration_not_found() {
    let backend = FakeBackend::new();
    backend.insert(ResourceObject::LoadBalancer(LoadBalancer {
        id: "lb-1".to_string(),
        ..Default::default()
    }));
    backend.script_trees("lb-1", vec![lb_tree("lb-1", Active, vec![], vec![])]);

    let object = ResourceObject::L7Policy(L7Policy {
        id: "pol-404".to_string(),
        ..Default::default()
    });
    let err = locate_load_balancer_id(&backend, &object).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, LbError::OwnerNotFound { .. }));
}

// ============================================================================
// Wait entry points
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_for_load_balancer_reaches_active() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_lb_statuses("lb-1", vec![PendingCreate, PendingCreate, Active]);

    reconciler(&backend)
        .wait_for_load_balancer("lb-1", Active, pending_statuses(), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(backend.count("fetch:loadbalancer:lb-1"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_tolerates_null_tree() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_trees(
        "lb-1",
        vec![
            StatusTree::from_envelope(StatusTreeEnvelope::default()),
            lb_tree("lb-1", Active, vec![], vec![pool_status("p-1", Active, vec![])]),
        ],
    );

    reconciler(&backend)
        .wait_for_pool(
            &pool("p-1", Some("lb-1"), None),
            Active,
            pending_statuses(),
            Duration::from_secs(60),
        )
        .await
        .unwrap();
    assert_eq!(backend.count("status_tree"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_listener_times_out_with_last_status() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_trees(
        "lb-1",
        vec![lb_tree(
            "lb-1",
            Active,
            vec![listener_status("l-1", PendingUpdate, vec![], vec![])],
            vec![],
        )],
    );

    let start = tokio::time::Instant::now();
    let err = reconciler(&backend)
        .wait_for_listener(
            &listener("l-1", "lb-1"),
            Active,
            pending_statuses(),
            Duration::from_secs(20),
        )
        .await
        .unwrap_err();

    match err {
        LbError::Timeout { last_status, .. } => assert_eq!(last_status, "PENDING_UPDATE"),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(start.elapsed() <= Duration::from_secs(21));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_member_deleted() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_trees(
        "lb-1",
        vec![
            lb_tree(
                "lb-1",
                PendingUpdate,
                vec![],
                vec![pool_status("p-1", Active, vec![member_status("m-1", PendingDelete)])],
            ),
            lb_tree("lb-1", Active, vec![], vec![pool_status("p-1", Active, vec![])]),
        ],
    );

    reconciler(&backend)
        .wait_for_member(
            &pool("p-1", Some("lb-1"), None),
            "m-1",
            ProvisioningStatus::Deleted,
            pending_delete_statuses(),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    // Second tree no longer lists the member; the direct GET 404s.
    assert_eq!(backend.count("fetch:member:m-1"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_is_cancelled() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_lb_statuses("lb-1", vec![PendingUpdate]);
    let token = tokio_util::sync::CancellationToken::new();
    let reconciler = reconciler(&backend).with_cancel(token.clone());

    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        trigger.cancel();
    });

    let err = reconciler
        .wait_for_load_balancer("lb-1", Active, pending_statuses(), Duration::from_secs(600))
        .await
        .unwrap_err();
    assert!(matches!(err, LbError::Cancelled(_)));
}

// ============================================================================
// Create / update / delete flows
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_create_pool_waits_for_listener_then_pool() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert(ResourceObject::Listener(listener("l-1", "lb-1")));
    backend.script_trees(
        "lb-1",
        vec![
            lb_tree(
                "lb-1",
                Active,
                vec![listener_status("l-1", PendingUpdate, vec![], vec![])],
                vec![],
            ),
            lb_tree(
                "lb-1",
                Active,
                vec![listener_status("l-1", PendingUpdate, vec![], vec![])],
                vec![],
            ),
            lb_tree(
                "lb-1",
                Active,
                vec![listener_status("l-1", Active, vec![], vec![])],
                vec![],
            ),
        ],
    );
    {
        let mut state = backend.state.lock().unwrap();
        state.create_result = Some(ResourceObject::Pool(Pool {
            provisioning_status: PendingCreate,
            ..pool("p-1", Some("lb-1"), Some("l-1"))
        }));
        let with_pool = |status| {
            lb_tree(
                "lb-1",
                Active,
                vec![listener_status(
                    "l-1",
                    Active,
                    vec![pool_status("p-1", status, vec![])],
                    vec![],
                )],
                vec![],
            )
        };
        state.after_create = Some((
            "lb-1".to_string(),
            vec![with_pool(PendingCreate), with_pool(PendingCreate), with_pool(Active)],
        ));
    }

    let spec = ResourceSpec::Pool(PoolSpec {
        listener_id: Some("l-1".to_string()),
        protocol: Some("HTTP".to_string()),
        lb_algorithm: Some("ROUND_ROBIN".to_string()),
        ..Default::default()
    });
    let created = reconciler(&backend).create(&spec).await.unwrap();
    assert_eq!(created.id(), "p-1");

    let calls = backend.calls();
    let create_at = calls.iter().position(|c| c == "create:pool").unwrap();
    let trees_before = calls[..create_at]
        .iter()
        .filter(|c| c.starts_with("status_tree"))
        .count();
    let trees_after = calls[create_at..]
        .iter()
        .filter(|c| c.starts_with("status_tree"))
        .count();

    // Listener observed pending twice, then ACTIVE, before the create.
    assert_eq!(trees_before, 3);
    // New pool polled until ACTIVE before returning.
    assert_eq!(trees_after, 3);
    assert_eq!(backend.count("create:pool"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_member_retries_conflicts() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert(ResourceObject::Pool(pool("p-1", Some("lb-1"), None)));
    let settled = lb_tree(
        "lb-1",
        Active,
        vec![],
        vec![pool_status("p-1", Active, vec![member_status("m-1", Active)])],
    );
    backend.script_trees("lb-1", vec![settled]);
    {
        let mut state = backend.state.lock().unwrap();
        for _ in 0..2 {
            state.create_errors.push_back(LbError::Conflict {
                resource_type: "member".to_string(),
                id: String::new(),
                message: "pool is PENDING_UPDATE".to_string(),
            });
        }
        state.create_result = Some(ResourceObject::Member(Member {
            id: "m-1".to_string(),
            pool_id: Some("p-1".to_string()),
            provisioning_status: PendingCreate,
            ..Default::default()
        }));
    }

    let spec = ResourceSpec::Member(MemberSpec {
        pool_id: "p-1".to_string(),
        address: Some("10.0.0.10".to_string()),
        protocol_port: Some(8080),
        ..Default::default()
    });
    let reconciler = reconciler(&backend).with_locks(LockRegistry::new());
    reconciler.create(&spec).await.unwrap();

    assert_eq!(backend.count("create:member"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_create_terminal_error_is_not_retried() {
    let backend = Arc::new(FakeBackend::new());
    backend.script_lb_statuses("lb-1", vec![Active]);
    backend.state.lock().unwrap().create_errors.push_back(LbError::Api {
        status: 400,
        message: "invalid protocol".to_string(),
    });

    let spec = ResourceSpec::Listener(ListenerSpec {
        loadbalancer_id: Some("lb-1".to_string()),
        protocol: Some("GOPHER".to_string()),
        ..Default::default()
    });
    let err = reconciler(&backend).create(&spec).await.unwrap_err();

    assert_eq!(err.http_status(), Some(400));
    assert_eq!(backend.count("create:listener"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delete_member_already_gone_on_delete_call() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert(ResourceObject::Pool(pool("p-1", Some("lb-1"), None)));
    backend.insert(ResourceObject::Member(Member {
        id: "m-1".to_string(),
        pool_id: Some("p-1".to_string()),
        provisioning_status: Active,
        ..Default::default()
    }));
    backend.script_trees(
        "lb-1",
        vec![lb_tree(
            "lb-1",
            Active,
            vec![],
            vec![pool_status("p-1", Active, vec![member_status("m-1", Active)])],
        )],
    );
    {
        // Someone else removed the member between our GET and the DELETE.
        let mut state = backend.state.lock().unwrap();
        state
            .delete_errors
            .push_back(LbError::not_found("member", "m-1"));
        state.after_delete = Some((
            "lb-1".to_string(),
            vec![lb_tree("lb-1", Active, vec![], vec![pool_status("p-1", Active, vec![])])],
        ));
    }

    reconciler(&backend)
        .delete(&ResourceKey::member("p-1", "m-1"))
        .await
        .unwrap();
    assert_eq!(backend.count("delete:member:m-1"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delete_pool_waits_until_gone() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert(ResourceObject::Pool(pool("p-1", Some("lb-1"), None)));
    backend.script_lb_statuses("lb-1", vec![Active]);
    backend.script_trees(
        "lb-1",
        vec![lb_tree("lb-1", Active, vec![], vec![pool_status("p-1", Active, vec![])])],
    );
    backend.state.lock().unwrap().after_delete = Some((
        "lb-1".to_string(),
        vec![
            lb_tree("lb-1", PendingUpdate, vec![], vec![pool_status("p-1", PendingDelete, vec![])]),
            lb_tree("lb-1", Active, vec![], vec![]),
        ],
    ));

    reconciler(&backend)
        .delete(&ResourceKey::new(ResourceKind::Pool, "p-1"))
        .await
        .unwrap();

    let calls = backend.calls();
    let delete_at = calls.iter().position(|c| c == "delete:pool:p-1").unwrap();
    assert!(calls[delete_at..].iter().any(|c| c == "fetch:pool:p-1"));
}

#[tokio::test(start_paused = true)]
async fn test_delete_missing_object_is_success() {
    let backend = Arc::new(FakeBackend::new());
    reconciler(&backend)
        .delete(&ResourceKey::new(ResourceKind::Listener, "l-gone"))
        .await
        .unwrap();
    assert_eq!(backend.count("delete"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_update_rejects_kind_mismatch() {
    let backend = Arc::new(FakeBackend::new());
    let spec = ResourceSpec::Pool(PoolSpec::default());
    let err = reconciler(&backend)
        .update(&ResourceKey::new(ResourceKind::Listener, "l-1"), &spec)
        .await
        .unwrap_err();
    assert!(matches!(err, LbError::ValidationError(_)));
}

#[tokio::test(start_paused = true)]
async fn test_resolve_owning_load_balancer_id() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert(ResourceObject::Pool(pool("p-1", None, Some("l-1"))));
    backend.insert(ResourceObject::Listener(listener("l-1", "lb-5")));
    backend.insert(ResourceObject::Monitor(Monitor {
        id: "hm-1".to_string(),
        pools: vec![IdRef::new("p-1")],
        ..Default::default()
    }));

    let lb_id = reconciler(&backend)
        .resolve_owning_load_balancer_id(&ResourceKey::new(ResourceKind::Monitor, "hm-1"))
        .await
        .unwrap();
    assert_eq!(lb_id, "lb-5");
}
