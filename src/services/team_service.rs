// src/services/team_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    common::error::{field_error, AppError},
    db::{CommissionRepository, RecordId, UserRepository},
    models::{
        commission::{Commission, CommissionStatus},
        dashboard::TeamMemberView,
        user::{InviteMember, User, UserPatch, UserRole},
    },
    services::query::{filter_team, TeamFilter, TeamHierarchy},
};

// Hierarquia em cache + a revisão da store de usuários usada para montá-la
type CachedHierarchy = Option<(u64, Arc<TeamHierarchy>)>;

#[derive(Clone)]
pub struct TeamService {
    users: UserRepository,
    commissions: CommissionRepository,
    cache: Arc<RwLock<CachedHierarchy>>,
}

impl TeamService {
    pub fn new(users: UserRepository, commissions: CommissionRepository) -> Self {
        Self {
            users,
            commissions,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get(&self, id: RecordId) -> Result<User, AppError> {
        self.users.get_by_id(id).await
    }

    /// Convida um novo membro. O upline, se informado, precisa existir e não ser sub-membro.
    pub async fn invite(&self, payload: InviteMember) -> Result<User, AppError> {
        let mut errors = match payload.validate() {
            Ok(()) => validator::ValidationErrors::new(),
            Err(e) => e,
        };

        if let Some(upline_id) = payload.upline_id {
            match self.users.get_by_id(upline_id).await {
                Ok(upline) if upline.role != UserRole::SubMember => {}
                Ok(upline) => errors.add(
                    "upline_id",
                    field_error("upline", format!("{}s cannot recruit.", upline.role.label())),
                ),
                Err(e) if e.is_not_found() => {
                    errors.add("upline_id", field_error("not_found", "Upline member not found."))
                }
                Err(e) => return Err(e),
            }
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let user = self.users.create(payload).await?;
        tracing::info!(user_id = user.id, role = %user.role, "Novo membro convidado: {}", user.name);
        Ok(user)
    }

    pub async fn set_active(&self, id: RecordId, is_active: bool) -> Result<User, AppError> {
        self.users
            .update(id, UserPatch { is_active: Some(is_active), ..Default::default() })
            .await
    }

    /// Recrutados diretos de um membro.
    pub async fn team_of(&self, upline_id: RecordId) -> Vec<User> {
        self.users.find_where(&|u: &User| u.upline_id == Some(upline_id)).await
    }

    /// Hierarquia montada uma vez e reaproveitada até a store de usuários mudar.
    pub async fn hierarchy(&self) -> Arc<TeamHierarchy> {
        let revision = self.users.revision().await;
        if let Some((cached_at, hierarchy)) = self.cache.read().await.as_ref() {
            if *cached_at == revision {
                return Arc::clone(hierarchy);
            }
        }

        let users = self.users.get_all().await;
        let hierarchy = Arc::new(TeamHierarchy::build(&users));
        *self.cache.write().await = Some((revision, Arc::clone(&hierarchy)));
        tracing::debug!(revision, members = hierarchy.nodes.len(), "Hierarquia da equipe reconstruída");
        hierarchy
    }

    /// Visão da equipe com vendas e ganhos calculados a cada chamada.
    pub async fn team_view(&self, filter: &TeamFilter) -> Vec<TeamMemberView> {
        let hierarchy = self.hierarchy().await;
        let commissions = self.commissions.get_all().await;

        let team: Vec<TeamMemberView> = hierarchy
            .nodes
            .iter()
            .map(|node| {
                let credited: Vec<&Commission> = commissions
                    .iter()
                    .filter(|c| c.member_id == Some(node.user.id) && c.status != CommissionStatus::Cancelled)
                    .collect();
                let total_earnings: Decimal = credited.iter().map(|c| c.share_for(node.user.role)).sum();

                TeamMemberView {
                    user: node.user.clone(),
                    sub_members: node.sub_members.clone(),
                    total_sales: credited.len(),
                    total_earnings,
                }
            })
            .collect();

        filter_team(&team, filter)
    }
}
