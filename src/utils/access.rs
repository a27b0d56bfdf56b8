use serde::Serialize;
use surrealdb::{RecordId, Surreal, engine::remote::ws::Client};
use tracing::info;

use crate::consts::app_const::{COMPANY_USER_TABLE, QUESTION_ACCESS_TABLE};
use crate::errors::{Error, Result};
use crate::models::company_user::CompanyUser;
use crate::models::organization::Organization;
use crate::models::question::Question;
use crate::models::question_access::{InviteStatus, QuestionAccess};
use crate::models::user::User;
use crate::utils::time::time_now;
use crate::utils::token::hash_token;

/// Everything needed to decide what a user may do with one question:
/// ownership, the public/active flags, the email allow-list and any
/// access grant held through a company-user roster row.
#[derive(Debug, Clone)]
pub struct QuestionContext {
    pub user: User,
    pub question: Question,
    pub has_grant: bool,
}

impl QuestionContext {
    pub fn is_owner(&self) -> bool {
        self.question.created_by == self.user.id
    }

    pub fn is_allowed_email(&self) -> bool {
        self.question
            .allowed_emails
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&self.user.email))
    }

    pub fn can_view(&self) -> bool {
        if self.question.deleted_at.is_some() {
            return false;
        }
        self.is_owner()
            || (self.question.is_public && self.question.is_active)
            || self.is_allowed_email()
            || self.has_grant
    }

    pub fn can_contribute(&self) -> bool {
        self.can_view() && self.question.is_active
    }
}

pub async fn create_question_context(
    sdb: &Surreal<Client>,
    user_id: RecordId,
    question_id: RecordId,
) -> Result<QuestionContext> {
    let user: User = sdb.select(user_id).await?.ok_or(Error::InvalidToken)?;
    let question: Question = sdb
        .select(question_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if question.deleted_at.is_some() {
        return Err(Error::NotFound);
    }

    let grants = sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id AND (company_user_id.email = $email OR company_user_id.user_id = $user_id);")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("question_id", question_id))
        .bind(("email", user.email.clone()))
        .bind(("user_id", user.id.clone()))
        .await?
        .take::<Vec<QuestionAccess>>(0)?;

    Ok(QuestionContext {
        user,
        question,
        has_grant: !grants.is_empty(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinAdmission {
    AccessLink,
    Whitelist,
    Domain,
}

/// Join policy order: access link first (bypasses domain/whitelist), then
/// the whitelist, then the email-domain list.
pub fn evaluate_join(org: &Organization, email: &str, token: Option<&str>) -> Option<JoinAdmission> {
    if let Some(token) = token {
        if org.link_join_enabled
            && org.access_link_hash.as_deref() == Some(hash_token(token).as_str())
        {
            return Some(JoinAdmission::AccessLink);
        }
    }

    if org.whitelist.iter().any(|e| e.eq_ignore_ascii_case(email)) {
        return Some(JoinAdmission::Whitelist);
    }

    if let Some((_, domain)) = email.rsplit_once('@') {
        if org.join_domains.iter().any(|d| d.eq_ignore_ascii_case(domain)) {
            return Some(JoinAdmission::Domain);
        }
    }

    None
}

#[derive(Serialize)]
struct CompanyUserLink {
    user_id: RecordId,
    updated_at: String,
}

#[derive(Serialize)]
struct GrantAcceptedPatch {
    invite_status: InviteStatus,
    updated_at: String,
}

/// Links unclaimed roster rows with the user's email to the account and
/// accepts every grant held through them. Idempotent.
pub async fn run_signup_linkage(sdb: &Surreal<Client>, user: &User) -> Result<()> {
    let rosters = sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email AND user_id == None;")
        .bind(("table", COMPANY_USER_TABLE))
        .bind(("email", user.email.clone()))
        .await?
        .take::<Vec<CompanyUser>>(0)?;

    for company_user in rosters {
        let _: Option<CompanyUser> = sdb
            .update(company_user.id.clone())
            .merge(CompanyUserLink {
                user_id: user.id.clone(),
                updated_at: time_now(),
            })
            .await?;

        let grants = sdb
            .query("SELECT * FROM type::table($table) WHERE company_user_id = $company_user_id;")
            .bind(("table", QUESTION_ACCESS_TABLE))
            .bind(("company_user_id", company_user.id.clone()))
            .await?
            .take::<Vec<QuestionAccess>>(0)?;
        for grant in grants {
            if grant.invite_status == InviteStatus::Accepted {
                continue;
            }
            let _: Option<QuestionAccess> = sdb
                .update(grant.id.clone())
                .merge(GrantAcceptedPatch {
                    invite_status: grant.invite_status.after_signup(),
                    updated_at: time_now(),
                })
                .await?;
        }

        info!(
            "linked company user {} to account {}",
            company_user.id, user.id
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{AuthProvider, UserRole};
    use crate::utils::token::generate_token;

    fn user(key: &str, email: &str) -> User {
        User {
            id: RecordId::from_table_key("users", key),
            name: "Test".to_string(),
            email: email.to_string(),
            role: UserRole::Participant,
            auth_provider: AuthProvider::Classic,
            email_verified: true,
            organization_id: None,
            created_at: time_now(),
            updated_at: None,
        }
    }

    fn question(owner_key: &str) -> Question {
        Question {
            id: RecordId::from_table_key("questions", "q1"),
            created_by: RecordId::from_table_key("users", owner_key),
            title: "Bike lanes".to_string(),
            body: "How should the city expand bike lanes?".to_string(),
            allowed_emails: vec!["allowed@example.com".to_string()],
            is_active: true,
            is_public: false,
            created_at: time_now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn ctx(user: User, question: Question, has_grant: bool) -> QuestionContext {
        QuestionContext {
            user,
            question,
            has_grant,
        }
    }

    #[test]
    fn test_owner_can_view_inactive_question() {
        let mut q = question("owner");
        q.is_active = false;
        let c = ctx(user("owner", "owner@example.com"), q, false);
        assert!(c.can_view());
        assert!(!c.can_contribute());
    }

    #[test]
    fn test_allowed_email_can_view() {
        let c = ctx(user("u2", "Allowed@Example.com"), question("owner"), false);
        assert!(c.can_view());
        assert!(c.can_contribute());
    }

    #[test]
    fn test_grant_holder_can_view() {
        let c = ctx(user("u3", "sme@example.com"), question("owner"), true);
        assert!(c.can_view());
    }

    #[test]
    fn test_stranger_cannot_view_private_question() {
        let c = ctx(user("u4", "other@example.com"), question("owner"), false);
        assert!(!c.can_view());
        assert!(!c.can_contribute());
    }

    #[test]
    fn test_public_active_question_is_visible_to_anyone() {
        let mut q = question("owner");
        q.is_public = true;
        let c = ctx(user("u5", "other@example.com"), q, false);
        assert!(c.can_view());
    }

    #[test]
    fn test_public_inactive_question_is_hidden_from_strangers() {
        let mut q = question("owner");
        q.is_public = true;
        q.is_active = false;
        let c = ctx(user("u6", "other@example.com"), q, false);
        assert!(!c.can_view());
    }

    #[test]
    fn test_deleted_question_is_invisible_even_to_owner() {
        let mut q = question("owner");
        q.deleted_at = Some(time_now());
        let c = ctx(user("owner", "owner@example.com"), q, false);
        assert!(!c.can_view());
    }

    #[test]
    fn test_inactive_question_blocks_contribution_but_not_view_for_grant_holder() {
        let mut q = question("owner");
        q.is_active = false;
        let c = ctx(user("u7", "sme@example.com"), q, true);
        assert!(c.can_view());
        assert!(!c.can_contribute());
    }

    fn org(key: &str) -> Organization {
        Organization {
            id: RecordId::from_table_key("organizations", key),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            created_by: RecordId::from_table_key("users", "admin"),
            join_domains: vec!["acme.com".to_string()],
            whitelist: vec!["guest@partner.org".to_string()],
            link_join_enabled: false,
            access_link_hash: None,
            created_at: time_now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_domain_join() {
        assert_eq!(
            evaluate_join(&org("o1"), "dev@ACME.com", None),
            Some(JoinAdmission::Domain)
        );
        assert_eq!(evaluate_join(&org("o1"), "dev@other.com", None), None);
    }

    #[test]
    fn test_whitelist_join() {
        assert_eq!(
            evaluate_join(&org("o1"), "guest@partner.org", None),
            Some(JoinAdmission::Whitelist)
        );
    }

    #[test]
    fn test_access_link_bypasses_domain_and_whitelist() {
        let (token, hash) = generate_token();
        let mut o = org("o1");
        o.link_join_enabled = true;
        o.access_link_hash = Some(hash);
        assert_eq!(
            evaluate_join(&o, "anyone@anywhere.net", Some(&token)),
            Some(JoinAdmission::AccessLink)
        );
    }

    #[test]
    fn test_disabled_access_link_is_refused() {
        let (token, hash) = generate_token();
        let mut o = org("o1");
        o.access_link_hash = Some(hash);
        assert_eq!(evaluate_join(&o, "anyone@anywhere.net", Some(&token)), None);
    }

    #[test]
    fn test_wrong_token_falls_through_to_other_policies() {
        let (_, hash) = generate_token();
        let mut o = org("o1");
        o.link_join_enabled = true;
        o.access_link_hash = Some(hash);
        assert_eq!(
            evaluate_join(&o, "dev@acme.com", Some("bogus")),
            Some(JoinAdmission::Domain)
        );
    }
}
