pub mod app_const {
    pub const USER_TABLE: &str = "users";
    pub const AUTH_PASSWORD_TABLE: &str = "auth_passwords";
    pub const EMAIL_VERIFICATION_TABLE: &str = "email_verifications";
    pub const ORGANIZATION_TABLE: &str = "organizations";
    pub const COMPANY_USER_TABLE: &str = "company_users";
    pub const QUESTION_TABLE: &str = "questions";
    pub const QUESTION_ACCESS_TABLE: &str = "question_access";
    pub const SOLUTION_TABLE: &str = "solutions";
    pub const PRO_TABLE: &str = "pros";
    pub const CON_TABLE: &str = "cons";
    pub const VOTE_TABLE: &str = "votes";
    pub const INVITE_BATCH_TABLE: &str = "invite_batches";
}
