//! Invitation service
//!
//! 邀请页的创建、查询、启停与删除。主题与商品目录仅对 premium 用户生效。

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{BiolinkError, Result};
use crate::session::Session;
use crate::storage::{
    CatalogueItem, InviteLink, Invitation, MAX_CATALOGUE_ITEMS, SeaOrmStorage, Theme,
};
use crate::utils::time_parser::parse_expiry;
use crate::utils::url_validator::validate_link_url;
use crate::utils::{generate_base36, generate_invite_id};

const MAX_TITLE_LEN: usize = 200;

/// 创建邀请页的请求体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInvitation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<InviteLink>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub catalogue: Vec<CatalogueItem>,
    /// RFC3339 或相对时间（`7d`、`12h`）
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// 返回给所有者的邀请页，附带分享链接
#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub invite_url: String,
    pub expired: bool,
}

impl InvitationView {
    pub fn new(invitation: Invitation, public_base_url: &str, now: DateTime<Utc>) -> Self {
        Self {
            invite_url: invitation.invite_url(public_base_url),
            expired: invitation.is_expired(now),
            invitation,
        }
    }
}

/// 只保留同时有标题和 URL 的链接
fn clean_invite_links(links: Vec<InviteLink>) -> Result<Vec<InviteLink>> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(links.len());

    for (i, link) in links.into_iter().enumerate() {
        let title = link.title.trim();
        if title.is_empty() || link.url.trim().is_empty() {
            continue;
        }
        let url = validate_link_url(&format!("links[{}].url", i), &link.url)?;

        let mut id = link.id.trim().to_string();
        if id.is_empty() || seen.contains(&id) {
            id = generate_base36(10);
        }
        seen.insert(id.clone());

        cleaned.push(InviteLink {
            id,
            title: title.to_string(),
            url,
            icon: link.icon.trim().to_string(),
            description: link
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        });
    }
    Ok(cleaned)
}

fn validate_catalogue(items: Vec<CatalogueItem>) -> Result<Vec<CatalogueItem>> {
    if items.len() > MAX_CATALOGUE_ITEMS {
        return Err(BiolinkError::validation(format!(
            "catalogue accepts at most {} items, got {}",
            MAX_CATALOGUE_ITEMS,
            items.len()
        )));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let title = item.title.trim().to_string();
            if title.is_empty() {
                return Err(BiolinkError::validation(format!(
                    "catalogue[{}].title is required",
                    i
                )));
            }
            let image = match item.image.trim() {
                "" => String::new(),
                image => validate_link_url(&format!("catalogue[{}].image", i), image)?,
            };
            let link = match item.link.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(url) => Some(validate_link_url(&format!("catalogue[{}].link", i), url)?),
            };
            Ok(CatalogueItem {
                title,
                image,
                description: item.description.trim().to_string(),
                price: item
                    .price
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
                link,
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct InvitationService {
    storage: Arc<SeaOrmStorage>,
    public_base_url: String,
}

impl InvitationService {
    pub fn new(storage: Arc<SeaOrmStorage>, public_base_url: impl Into<String>) -> Self {
        Self {
            storage,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// 当前用户的全部邀请页，最新在前
    pub async fn list(&self, session: &Session) -> Result<Vec<InvitationView>> {
        let now = Utc::now();
        let invitations = self.storage.list_invitations(&session.user_id).await?;
        Ok(invitations
            .into_iter()
            .map(|inv| InvitationView::new(inv, &self.public_base_url, now))
            .collect())
    }

    pub async fn create(&self, session: &Session, req: NewInvitation) -> Result<InvitationView> {
        let now = Utc::now();

        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(BiolinkError::validation("title is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(BiolinkError::validation(format!(
                "title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        let links = clean_invite_links(req.links)?;

        // 非 premium 用户的主题 / 目录直接忽略
        let (theme, catalogue) = if session.premium {
            (
                req.theme.map(Theme::validated).transpose()?,
                validate_catalogue(req.catalogue)?,
            )
        } else {
            (None, Vec::new())
        };

        let expires_at = match req.expires_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(input) => Some(parse_expiry(input, now)?),
        };

        let invitation = Invitation {
            id: generate_invite_id(),
            user_id: session.user_id.clone(),
            title,
            description: req.description.trim().to_string(),
            links,
            theme,
            catalogue,
            is_active: true,
            created_at: now,
            expires_at,
        };

        self.storage.insert_invitation(&invitation).await?;
        info!(
            "Invitation {} created by {} ({} links)",
            invitation.id,
            session.user_id,
            invitation.links.len()
        );

        Ok(InvitationView::new(invitation, &self.public_base_url, now))
    }

    /// 所有者读取自己的邀请页，他人的视为不存在
    pub async fn get_own(&self, session: &Session, id: &str) -> Result<Invitation> {
        match self.storage.get_invitation(id).await? {
            Some(inv) if inv.user_id == session.user_id => Ok(inv),
            _ => Err(BiolinkError::not_found(format!("Invitation not found: {}", id))),
        }
    }

    pub async fn get_own_view(&self, session: &Session, id: &str) -> Result<InvitationView> {
        let inv = self.get_own(session, id).await?;
        Ok(InvitationView::new(inv, &self.public_base_url, Utc::now()))
    }

    /// 公开访问，仅返回启用且未过期的邀请页
    pub async fn get_public(&self, id: &str) -> Result<Invitation> {
        let now = Utc::now();
        match self.storage.get_invitation(id).await? {
            Some(inv) if inv.is_active && !inv.is_expired(now) => Ok(inv),
            _ => Err(BiolinkError::not_found(format!("Invitation not found: {}", id))),
        }
    }

    /// 停用后公开访问返回 404，也不再记录事件
    pub async fn set_active(
        &self,
        session: &Session,
        id: &str,
        active: bool,
    ) -> Result<InvitationView> {
        let mut invitation = self.get_own(session, id).await?;
        self.storage
            .set_invitation_active(&session.user_id, id, active)
            .await?;
        invitation.is_active = active;
        Ok(InvitationView::new(
            invitation,
            &self.public_base_url,
            Utc::now(),
        ))
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<()> {
        if !self.storage.delete_invitation(&session.user_id, id).await? {
            return Err(BiolinkError::not_found(format!("Invitation not found: {}", id)));
        }
        info!("Invitation {} deleted by {}", id, session.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(title: &str, url: &str) -> InviteLink {
        InviteLink {
            id: String::new(),
            title: title.into(),
            url: url.into(),
            icon: String::new(),
            description: Some("  ".into()),
        }
    }

    fn item(title: &str) -> CatalogueItem {
        CatalogueItem {
            title: title.into(),
            image: String::new(),
            description: String::new(),
            price: Some("$5".into()),
            link: None,
        }
    }

    #[test]
    fn test_invite_links_filtered_and_ids_assigned() {
        let links = clean_invite_links(vec![
            link("RSVP", "https://forms.example/rsvp"),
            link("", "https://x.example"),
            link("Map", ""),
        ])
        .unwrap();
        assert_eq!(links.len(), 1);
        assert!(!links[0].id.is_empty());
        assert_eq!(links[0].description, None);
    }

    #[test]
    fn test_catalogue_limit() {
        let five: Vec<_> = (0..5).map(|i| item(&format!("Item {}", i))).collect();
        assert_eq!(validate_catalogue(five).unwrap().len(), 5);

        let six: Vec<_> = (0..6).map(|i| item(&format!("Item {}", i))).collect();
        assert!(matches!(
            validate_catalogue(six),
            Err(BiolinkError::Validation(_))
        ));
    }

    #[test]
    fn test_catalogue_item_requires_title() {
        assert!(validate_catalogue(vec![item("  ")]).is_err());
    }

    #[test]
    fn test_catalogue_link_validated() {
        let mut bad = item("Cake");
        bad.link = Some("ftp://cake.example".into());
        assert!(validate_catalogue(vec![bad]).is_err());
    }
}
