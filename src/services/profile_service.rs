//! Profile service
//!
//! 用户资料的读取与保存。premium 标记只读，由外部开通流程维护。

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{BiolinkError, Result};
use crate::session::Session;
use crate::storage::{Profile, ProfileLink, SeaOrmStorage};
use crate::utils::generate_base36;
use crate::utils::url_validator::validate_link_url;

const MAX_USERNAME_LEN: usize = 32;
const MAX_BIO_LEN: usize = 500;

/// 保存资料的请求体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// 公开主页展示的字段，不含联系方式与 premium 状态
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub username: String,
    pub name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub links: Vec<ProfileLink>,
}

impl PublicProfile {
    fn from_profile(profile: Profile, username: &str) -> Self {
        Self {
            username: profile.username.unwrap_or_else(|| username.to_string()),
            name: profile.name,
            bio: profile.bio,
            avatar: profile.avatar,
            links: profile.links,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_username(username: &str) -> Result<()> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if username.len() < 3 || username.len() > MAX_USERNAME_LEN || !valid_chars {
        return Err(BiolinkError::validation(format!(
            "username must be 3-{} characters of letters, digits, '_' or '-'",
            MAX_USERNAME_LEN
        )));
    }
    Ok(())
}

/// 丢弃标题或 URL 为空的链接，校验 URL，补齐缺失 / 重复的 id
fn clean_profile_links(links: Vec<ProfileLink>) -> Result<Vec<ProfileLink>> {
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

        cleaned.push(ProfileLink {
            id,
            title: title.to_string(),
            url,
            icon: link.icon.trim().to_string(),
        });
    }
    Ok(cleaned)
}

#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
}

impl ProfileService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get(&self, user_id: &str) -> Result<Profile> {
        self.storage
            .get_profile(user_id)
            .await?
            .ok_or_else(|| BiolinkError::not_found(format!("Profile not found: {}", user_id)))
    }

    /// 按 username 读取公开主页
    pub async fn get_public(&self, username: &str) -> Result<PublicProfile> {
        let username = username.trim();
        if validate_username(username).is_err() {
            return Err(BiolinkError::not_found(format!(
                "Profile not found: {}",
                username
            )));
        }
        self.storage
            .get_profile_by_username(username)
            .await?
            .map(|profile| PublicProfile::from_profile(profile, username))
            .ok_or_else(|| BiolinkError::not_found(format!("Profile not found: {}", username)))
    }

    /// 首次认证请求时创建空资料
    pub async fn ensure(&self, user_id: &str, email: Option<String>) -> Result<()> {
        self.storage.ensure_profile(user_id, email, Utc::now()).await
    }

    /// 查询失败或资料不存在时视为非 premium
    pub async fn is_premium(&self, user_id: &str) -> bool {
        match self.storage.get_profile(user_id).await {
            Ok(Some(profile)) => profile.premium,
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to load premium status for {}: {}", user_id, e);
                false
            }
        }
    }

    pub async fn save(&self, session: &Session, update: ProfileUpdate) -> Result<Profile> {
        let now = Utc::now();
        let existing = self.storage.get_profile(&session.user_id).await?;

        let username = non_blank(update.username);
        if let Some(ref username) = username {
            validate_username(username)?;
            if self
                .storage
                .username_taken(username, &session.user_id)
                .await?
            {
                return Err(BiolinkError::validation(format!(
                    "username '{}' is already taken",
                    username
                )));
            }
        }

        let bio = update.bio.trim().to_string();
        if bio.chars().count() > MAX_BIO_LEN {
            return Err(BiolinkError::validation(format!(
                "bio must be at most {} characters",
                MAX_BIO_LEN
            )));
        }

        let avatar = non_blank(update.avatar)
            .map(|url| validate_link_url("avatar", &url))
            .transpose()?;

        let base = existing.unwrap_or_else(|| {
            Profile::empty(session.user_id.clone(), session.email.clone(), now)
        });

        let profile = Profile {
            name: update.name.trim().to_string(),
            username,
            bio,
            avatar,
            links: clean_profile_links(update.links)?,
            email: session.email.clone().or(base.email.clone()),
            phone: non_blank(update.phone),
            country_code: non_blank(update.country_code),
            updated_at: now,
            ..base
        };

        let saved = self.storage.upsert_profile(&profile).await?;
        info!("Profile updated by {}", session.user_id);
        Ok(saved)
    }
}
