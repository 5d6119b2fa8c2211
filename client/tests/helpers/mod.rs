//! Reusable helpers for client integration tests.
//!
//! [`spawn_market`] starts an in-memory marketplace backend on a random port.
//! It enforces the rules the real service owns: who may move a swap to which
//! status, +5 coins to each party when a swap completes, one rating per user
//! per swap, and 403 on login for banned accounts.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use skillswap_client::{ApiClient, Client, ClientConfig, MemoryTokenStore, Session};
use skillswap_common::forms::LoginForm;
use skillswap_common::{
    AdminDashboard, AdminSkill, AdminStats, AdminSwap, AdminUser, ApproveSkillRequest,
    BanUserRequest, CoinAdjustment, CoinBalance, LoginRequest, ModerationStatus, NewPlatformMessage,
    NewRating, NewSkill, NewSwap, PhotoUploadResponse, PlatformMessage, PublicUser, Rating,
    RegisterRequest, RejectSkillRequest, ReportFormat, ReportRequest, Skill, SkillId, SkillLevel,
    SkillType, SkillUpdate, Swap, SwapBonus, SwapId, SwapStatus, TokenResponse, UnbanUserRequest,
    User, UserId, UserStats,
};
use tokio::task::JoinHandle;

/// Password given to every seeded account.
pub const PASSWORD: &str = "Abc123!@";

/// Coins credited to each party of a completed swap.
pub const COMPLETION_BONUS: i64 = 5;

// ============================================================================
// Market state
// ============================================================================

struct Account {
    user: User,
    password: String,
    coins: i64,
}

/// Everything the fake backend knows.
#[derive(Default)]
pub struct Market {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    skills: Vec<Skill>,
    swaps: Vec<Swap>,
    ratings: Vec<Rating>,
    messages: Vec<PlatformMessage>,
    next_id: i64,
    /// When set, `PUT`/`DELETE /skills/{id}` answer 500.
    pub fail_skill_writes: bool,
    /// When set, `GET /swaps` answers 500.
    pub fail_swap_list: bool,
}

type Shared = Arc<Mutex<Market>>;

fn lock(market: &Shared) -> MutexGuard<'_, Market> {
    market.lock().expect("market lock poisoned")
}

impl Market {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn account(&self, id: UserId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.user.id == id)
    }

    fn account_mut(&mut self, id: UserId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.user.id == id)
    }

    fn add_user(&mut self, name: &str, email: &str, password: &str, is_admin: bool) -> UserId {
        let id = self.id();
        self.accounts.push(Account {
            user: User {
                id,
                name: name.to_string(),
                email: email.to_string(),
                location: None,
                photo_path: None,
                availability: None,
                is_public: true,
                is_admin,
                is_banned: false,
                created_at: Some("2026-01-01T00:00:00".to_string()),
                last_login: None,
            },
            password: password.to_string(),
            coins: 0,
        });
        id
    }

    fn add_skill(&mut self, user_id: UserId, skill: &NewSkill) -> Skill {
        let skill = Skill {
            id: self.id(),
            user_id,
            name: skill.name.clone(),
            skill_type: skill.skill_type,
            level: skill.level,
            description: skill.description.clone(),
            status: Some(ModerationStatus::Pending),
        };
        self.skills.push(skill.clone());
        skill
    }

    fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    fn caller(&self, headers: &HeaderMap) -> Result<UserId, Fail> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
        let id = *self
            .tokens
            .get(token)
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))?;
        match self.account(id) {
            Some(a) if a.user.is_banned => Err(fail(StatusCode::FORBIDDEN, "Account is banned")),
            Some(_) => Ok(id),
            None => Err(fail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
        }
    }

    fn admin(&self, headers: &HeaderMap) -> Result<UserId, Fail> {
        let id = self.caller(headers)?;
        if self.account(id).is_some_and(|a| a.user.is_admin) {
            Ok(id)
        } else {
            Err(fail(StatusCode::FORBIDDEN, "Admin access required"))
        }
    }

    fn named(&self, swap: &Swap) -> Swap {
        let mut swap = swap.clone();
        swap.from_user_name = self.account(swap.from_user_id).map(|a| a.user.name.clone());
        swap.to_user_name = self.account(swap.to_user_id).map(|a| a.user.name.clone());
        swap.skill_offered_name = self.skill(swap.skill_offered_id).map(|s| s.name.clone());
        swap.skill_requested_name = self.skill(swap.skill_requested_id).map(|s| s.name.clone());
        swap
    }

    fn average_rating(&self, user_id: UserId) -> Option<f64> {
        let stars: Vec<f64> = self
            .ratings
            .iter()
            .filter(|r| r.to_user_id == user_id)
            .map(|r| f64::from(r.stars))
            .collect();
        (!stars.is_empty()).then(|| stars.iter().sum::<f64>() / stars.len() as f64)
    }

    fn admin_user(&self, account: &Account) -> AdminUser {
        let id = account.user.id;
        AdminUser {
            id,
            name: account.user.name.clone(),
            email: account.user.email.clone(),
            location: account.user.location.clone(),
            is_public: account.user.is_public,
            is_admin: account.user.is_admin,
            is_banned: account.user.is_banned,
            created_at: account.user.created_at.clone(),
            last_login: None,
            total_swaps: self
                .swaps
                .iter()
                .filter(|s| s.from_user_id == id || s.to_user_id == id)
                .count() as i64,
            total_skills: self.skills.iter().filter(|s| s.user_id == id).count() as i64,
            average_rating: self.average_rating(id).unwrap_or(0.0),
        }
    }

    fn admin_skill(&self, skill: &Skill) -> AdminSkill {
        let owner = self.account(skill.user_id);
        AdminSkill {
            id: skill.id,
            name: skill.name.clone(),
            skill_type: skill.skill_type,
            level: skill.level,
            user_id: skill.user_id,
            user_name: owner.map(|a| a.user.name.clone()),
            user_email: owner.map(|a| a.user.email.clone()),
            status: skill.moderation(),
            created_at: None,
        }
    }

    fn admin_swap(&self, swap: &Swap) -> AdminSwap {
        let swap = self.named(swap);
        AdminSwap {
            id: swap.id,
            from_user_id: swap.from_user_id,
            to_user_id: swap.to_user_id,
            skill_offered_id: swap.skill_offered_id,
            skill_requested_id: swap.skill_requested_id,
            status: swap.status,
            from_user_name: swap.from_user_name,
            to_user_name: swap.to_user_name,
            skill_offered_name: swap.skill_offered_name,
            skill_requested_name: swap.skill_requested_name,
            created_at: swap.created_at,
            updated_at: swap.updated_at,
        }
    }

    fn stats(&self) -> AdminStats {
        let count = |status: SwapStatus| self.swaps.iter().filter(|s| s.status == status).count() as i64;
        let banned = self.accounts.iter().filter(|a| a.user.is_banned).count() as i64;
        let total_stars: f64 = self.ratings.iter().map(|r| f64::from(r.stars)).sum();
        AdminStats {
            total_users: self.accounts.len() as i64,
            active_users: self.accounts.len() as i64 - banned,
            banned_users: banned,
            total_swaps: self.swaps.len() as i64,
            pending_swaps: count(SwapStatus::Pending),
            completed_swaps: count(SwapStatus::Completed),
            total_skills: self.skills.len() as i64,
            pending_skills: self
                .skills
                .iter()
                .filter(|s| s.moderation() == ModerationStatus::Pending)
                .count() as i64,
            total_ratings: self.ratings.len() as i64,
            average_rating: if self.ratings.is_empty() {
                0.0
            } else {
                total_stars / self.ratings.len() as f64
            },
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// FastAPI-style `{ "detail": ... }` failure.
pub struct Fail(StatusCode, String);

fn fail(status: StatusCode, detail: &str) -> Fail {
    Fail(status, detail.to_string())
}

impl IntoResponse for Fail {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

type Reply<T> = Result<Json<T>, Fail>;

// ============================================================================
// Account handlers
// ============================================================================

async fn login(State(m): State<Shared>, Json(body): Json<LoginRequest>) -> Reply<TokenResponse> {
    let mut market = lock(&m);
    let (id, banned) = market
        .accounts
        .iter()
        .find(|a| a.user.email == body.email && a.password == body.password)
        .map(|a| (a.user.id, a.user.is_banned))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;
    if banned {
        return Err(fail(StatusCode::FORBIDDEN, "Account is banned"));
    }
    let token = format!("token-{id}-{}", market.id());
    market.tokens.insert(token.clone(), id);
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

async fn register(State(m): State<Shared>, Json(body): Json<RegisterRequest>) -> Reply<User> {
    let mut market = lock(&m);
    if market.accounts.iter().any(|a| a.user.email == body.email) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let id = market.add_user(&body.name, &body.email, &body.password, false);
    let account = market.account_mut(id).expect("just added");
    account.user.location = body.location;
    account.user.photo_path = body.photo_path;
    account.user.availability = body.availability;
    account.user.is_public = body.is_public;
    Ok(Json(account.user.clone()))
}

async fn upload_photo(mut multipart: Multipart) -> Reply<PhotoUploadResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(fail(StatusCode::BAD_REQUEST, "File must be an image"));
        }
        field
            .bytes()
            .await
            .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
        return Ok(Json(PhotoUploadResponse {
            photo_path: format!("uploads/{file_name}"),
        }));
    }
    Err(fail(StatusCode::BAD_REQUEST, "No file uploaded"))
}

async fn me(State(m): State<Shared>, headers: HeaderMap) -> Reply<User> {
    let market = lock(&m);
    let id = market.caller(&headers)?;
    Ok(Json(market.account(id).expect("caller exists").user.clone()))
}

async fn my_stats(State(m): State<Shared>, headers: HeaderMap) -> Reply<UserStats> {
    let market = lock(&m);
    let id = market.caller(&headers)?;
    let mine: Vec<&Swap> = market
        .swaps
        .iter()
        .filter(|s| s.from_user_id == id || s.to_user_id == id)
        .collect();
    Ok(Json(UserStats {
        total_swaps: mine.len() as i64,
        completed_swaps: mine
            .iter()
            .filter(|s| s.status == SwapStatus::Completed)
            .count() as i64,
        average_rating: market.average_rating(id).unwrap_or(0.0),
        total_ratings: market.ratings.iter().filter(|r| r.to_user_id == id).count() as i64,
    }))
}

async fn set_visibility(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply<User> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    let is_public = body
        .get("is_public")
        .and_then(Value::as_bool)
        .ok_or_else(|| fail(StatusCode::UNPROCESSABLE_ENTITY, "is_public is required"))?;
    let account = market.account_mut(id).expect("caller exists");
    account.user.is_public = is_public;
    Ok(Json(account.user.clone()))
}

async fn set_availability(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply<User> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    let availability = body
        .get("availability")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let account = market.account_mut(id).expect("caller exists");
    account.user.availability = availability;
    Ok(Json(account.user.clone()))
}

async fn public_users(State(m): State<Shared>) -> Json<Vec<PublicUser>> {
    let market = lock(&m);
    let users = market
        .accounts
        .iter()
        .filter(|a| a.user.is_public && !a.user.is_banned)
        .map(|a| PublicUser {
            id: a.user.id,
            name: a.user.name.clone(),
            location: a.user.location.clone(),
            photo_path: a.user.photo_path.clone(),
            availability: a.user.availability.clone(),
            skills: market
                .skills
                .iter()
                .filter(|s| s.user_id == a.user.id)
                .cloned()
                .collect(),
            average_rating: market.average_rating(a.user.id),
        })
        .collect();
    Json(users)
}

// ============================================================================
// Skill handlers
// ============================================================================

async fn list_skills(State(m): State<Shared>, headers: HeaderMap) -> Reply<Vec<Skill>> {
    let market = lock(&m);
    let id = market.caller(&headers)?;
    Ok(Json(
        market.skills.iter().filter(|s| s.user_id == id).cloned().collect(),
    ))
}

async fn create_skill(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewSkill>,
) -> Reply<Skill> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    Ok(Json(market.add_skill(id, &body)))
}

async fn update_skill(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(skill_id): Path<SkillId>,
    Json(body): Json<SkillUpdate>,
) -> Reply<Skill> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    if market.fail_skill_writes {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
    }
    let skill = market
        .skills
        .iter_mut()
        .find(|s| s.id == skill_id && s.user_id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Skill not found"))?;
    skill.apply(&body);
    Ok(Json(skill.clone()))
}

async fn delete_skill(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(skill_id): Path<SkillId>,
) -> Reply<Value> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    if market.fail_skill_writes {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
    }
    let before = market.skills.len();
    market.skills.retain(|s| !(s.id == skill_id && s.user_id == id));
    if market.skills.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Skill not found"));
    }
    Ok(Json(json!({ "message": "Skill deleted" })))
}

// ============================================================================
// Swap handlers
// ============================================================================

async fn list_swaps(State(m): State<Shared>, headers: HeaderMap) -> Reply<Vec<Swap>> {
    let market = lock(&m);
    let id = market.caller(&headers)?;
    if market.fail_swap_list {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"));
    }
    Ok(Json(
        market
            .swaps
            .iter()
            .filter(|s| s.from_user_id == id || s.to_user_id == id)
            .map(|s| market.named(s))
            .collect(),
    ))
}

async fn create_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewSwap>,
) -> Reply<Swap> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    if body.to_user_id == id {
        return Err(fail(StatusCode::BAD_REQUEST, "Cannot request a swap with yourself"));
    }
    if market.account(body.to_user_id).is_none() {
        return Err(fail(StatusCode::NOT_FOUND, "User not found"));
    }
    let offered_ok = market
        .skill(body.skill_offered_id)
        .is_some_and(|s| s.user_id == id && s.is_offered());
    if !offered_ok {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid offered skill"));
    }
    let requested_ok = market
        .skill(body.skill_requested_id)
        .is_some_and(|s| s.user_id == body.to_user_id && s.is_offered());
    if !requested_ok {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid requested skill"));
    }

    let swap = Swap {
        id: market.id(),
        from_user_id: id,
        to_user_id: body.to_user_id,
        skill_offered_id: body.skill_offered_id,
        skill_requested_id: body.skill_requested_id,
        status: SwapStatus::Pending,
        from_user_name: None,
        to_user_name: None,
        skill_offered_name: None,
        skill_requested_name: None,
        created_at: Some("2026-01-02T10:00:00".to_string()),
        updated_at: None,
    };
    market.swaps.push(swap.clone());
    Ok(Json(market.named(&swap)))
}

fn move_swap(market: &mut Market, caller: UserId, swap_id: SwapId, to: SwapStatus) -> Reply<Swap> {
    let denied = || fail(StatusCode::BAD_REQUEST, "Swap not found or not authorized");
    let swap = market
        .swaps
        .iter_mut()
        .find(|s| s.id == swap_id)
        .ok_or_else(denied)?;

    let allowed = match to {
        SwapStatus::Accepted | SwapStatus::Rejected => {
            swap.to_user_id == caller && swap.status == SwapStatus::Pending
        }
        SwapStatus::Completed => {
            (swap.from_user_id == caller || swap.to_user_id == caller)
                && swap.status == SwapStatus::Accepted
        }
        SwapStatus::Cancelled => swap.from_user_id == caller && swap.status == SwapStatus::Pending,
        SwapStatus::Pending => false,
    };
    if !allowed {
        return Err(denied());
    }

    swap.status = to;
    swap.updated_at = Some("2026-01-03T10:00:00".to_string());
    let swap = swap.clone();

    if to == SwapStatus::Completed {
        for party in [swap.from_user_id, swap.to_user_id] {
            if let Some(account) = market.account_mut(party) {
                account.coins += COMPLETION_BONUS;
            }
        }
    }
    Ok(Json(market.named(&swap)))
}

async fn accept_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
) -> Reply<Swap> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    move_swap(&mut market, id, swap_id, SwapStatus::Accepted)
}

async fn reject_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
) -> Reply<Swap> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    move_swap(&mut market, id, swap_id, SwapStatus::Rejected)
}

async fn complete_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
) -> Reply<Swap> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    move_swap(&mut market, id, swap_id, SwapStatus::Completed)
}

async fn cancel_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
) -> Reply<Value> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    move_swap(&mut market, id, swap_id, SwapStatus::Cancelled)?;
    Ok(Json(json!({ "message": "Swap cancelled" })))
}

async fn rate_swap(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
    Json(body): Json<NewRating>,
) -> Reply<Rating> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    let swap = market
        .swaps
        .iter()
        .find(|s| s.id == swap_id && (s.from_user_id == id || s.to_user_id == id))
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Swap not found"))?;
    if swap.status != SwapStatus::Completed {
        return Err(fail(StatusCode::BAD_REQUEST, "Can only rate completed swaps"));
    }
    let counterpart = if swap.from_user_id == id {
        swap.to_user_id
    } else {
        swap.from_user_id
    };
    if body.to_user_id != counterpart {
        return Err(fail(StatusCode::BAD_REQUEST, "Can only rate the other participant"));
    }
    if !(1..=5).contains(&body.stars) {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, "Rating must be between 1 and 5"));
    }
    if market
        .ratings
        .iter()
        .any(|r| r.swap_id == swap_id && r.from_user_id == id)
    {
        return Err(fail(StatusCode::BAD_REQUEST, "You have already rated this swap"));
    }

    let rating = Rating {
        id: Some(market.id()),
        swap_id,
        from_user_id: id,
        to_user_id: counterpart,
        stars: body.stars,
        feedback: body.feedback,
    };
    market.ratings.push(rating.clone());
    Ok(Json(rating))
}

async fn swap_ratings(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(swap_id): Path<SwapId>,
) -> Reply<Vec<Rating>> {
    let market = lock(&m);
    market.caller(&headers)?;
    Ok(Json(
        market
            .ratings
            .iter()
            .filter(|r| r.swap_id == swap_id)
            .cloned()
            .collect(),
    ))
}

// ============================================================================
// Coin handlers
// ============================================================================

#[derive(Deserialize)]
struct AmountQuery {
    amount: i64,
}

async fn coins(State(m): State<Shared>, headers: HeaderMap) -> Reply<CoinBalance> {
    let market = lock(&m);
    let id = market.caller(&headers)?;
    Ok(Json(CoinBalance {
        coins: market.account(id).map_or(0, |a| a.coins),
    }))
}

async fn add_coins(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<AmountQuery>,
) -> Reply<CoinAdjustment> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    if q.amount <= 0 {
        return Err(fail(StatusCode::BAD_REQUEST, "Amount must be positive"));
    }
    let account = market.account_mut(id).expect("caller exists");
    account.coins += q.amount;
    Ok(Json(CoinAdjustment {
        coins: account.coins,
        added: Some(q.amount),
        deducted: None,
    }))
}

async fn deduct_coins(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<AmountQuery>,
) -> Reply<CoinAdjustment> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    if q.amount <= 0 {
        return Err(fail(StatusCode::BAD_REQUEST, "Amount must be positive"));
    }
    let account = market.account_mut(id).expect("caller exists");
    if account.coins < q.amount {
        return Err(fail(StatusCode::BAD_REQUEST, "Insufficient coins"));
    }
    account.coins -= q.amount;
    Ok(Json(CoinAdjustment {
        coins: account.coins,
        added: None,
        deducted: Some(q.amount),
    }))
}

async fn swap_bonus(State(m): State<Shared>, headers: HeaderMap) -> Reply<SwapBonus> {
    let mut market = lock(&m);
    let id = market.caller(&headers)?;
    let completed = market
        .swaps
        .iter()
        .filter(|s| (s.from_user_id == id || s.to_user_id == id) && s.status == SwapStatus::Completed)
        .count() as i64;
    let bonus = completed * COMPLETION_BONUS;
    let account = market.account_mut(id).expect("caller exists");
    account.coins += bonus;
    Ok(Json(SwapBonus {
        coins: account.coins,
        bonus_awarded: bonus,
        completed_swaps: completed,
    }))
}

// ============================================================================
// Admin handlers
// ============================================================================

#[derive(Deserialize, Default)]
struct ListParams {
    skip: Option<usize>,
    limit: Option<usize>,
    status: Option<String>,
}

fn page<T>(items: Vec<T>, params: &ListParams) -> Vec<T> {
    items
        .into_iter()
        .skip(params.skip.unwrap_or(0))
        .take(params.limit.unwrap_or(usize::MAX))
        .collect()
}

async fn admin_dashboard(State(m): State<Shared>, headers: HeaderMap) -> Reply<AdminDashboard> {
    let market = lock(&m);
    market.admin(&headers)?;
    Ok(Json(AdminDashboard {
        stats: market.stats(),
        recent_users: market.accounts.iter().map(|a| market.admin_user(a)).collect(),
        recent_swaps: market.swaps.iter().map(|s| market.admin_swap(s)).collect(),
        pending_skills: market
            .skills
            .iter()
            .filter(|s| s.moderation() == ModerationStatus::Pending)
            .map(|s| market.admin_skill(s))
            .collect(),
    }))
}

async fn admin_stats(State(m): State<Shared>, headers: HeaderMap) -> Reply<AdminStats> {
    let market = lock(&m);
    market.admin(&headers)?;
    Ok(Json(market.stats()))
}

/// Answers with the `{ items, total }` wrapper.
async fn admin_users(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Value> {
    let market = lock(&m);
    market.admin(&headers)?;
    let users: Vec<AdminUser> = market
        .accounts
        .iter()
        .filter(|a| match params.status.as_deref() {
            Some("banned") => a.user.is_banned,
            Some("active") => !a.user.is_banned,
            _ => true,
        })
        .map(|a| market.admin_user(a))
        .collect();
    let total = users.len();
    Ok(Json(json!({ "items": page(users, &params), "total": total })))
}

/// Answers with a bare array.
async fn admin_skills(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Vec<AdminSkill>> {
    let market = lock(&m);
    market.admin(&headers)?;
    let skills: Vec<AdminSkill> = market
        .skills
        .iter()
        .map(|s| market.admin_skill(s))
        .filter(|s| {
            params
                .status
                .as_deref()
                .is_none_or(|wanted| s.status.as_str() == wanted)
        })
        .collect();
    Ok(Json(page(skills, &params)))
}

async fn admin_swaps(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Vec<AdminSwap>> {
    let market = lock(&m);
    market.admin(&headers)?;
    let swaps: Vec<AdminSwap> = market
        .swaps
        .iter()
        .filter(|s| {
            params
                .status
                .as_deref()
                .is_none_or(|wanted| s.status.as_str() == wanted)
        })
        .map(|s| market.admin_swap(s))
        .collect();
    Ok(Json(page(swaps, &params)))
}

async fn ban_user(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<BanUserRequest>,
) -> Reply<Value> {
    let mut market = lock(&m);
    let admin = market.admin(&headers)?;
    if body.user_id == admin {
        return Err(fail(StatusCode::BAD_REQUEST, "Cannot ban yourself"));
    }
    let account = market
        .account_mut(body.user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    account.user.is_banned = true;
    Ok(Json(json!({ "message": format!("User banned: {}", body.reason) })))
}

async fn unban_user(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<UnbanUserRequest>,
) -> Reply<Value> {
    let mut market = lock(&m);
    market.admin(&headers)?;
    let account = market
        .account_mut(body.user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    account.user.is_banned = false;
    Ok(Json(json!({ "message": "User unbanned" })))
}

fn moderate(market: &mut Market, skill_id: SkillId, status: ModerationStatus) -> Result<(), Fail> {
    let skill = market
        .skills
        .iter_mut()
        .find(|s| s.id == skill_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Skill not found"))?;
    skill.status = Some(status);
    Ok(())
}

async fn approve_skill(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ApproveSkillRequest>,
) -> Reply<Value> {
    let mut market = lock(&m);
    market.admin(&headers)?;
    moderate(&mut market, body.skill_id, ModerationStatus::Approved)?;
    Ok(Json(json!({ "message": "Skill approved" })))
}

async fn reject_skill(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<RejectSkillRequest>,
) -> Reply<Value> {
    let mut market = lock(&m);
    market.admin(&headers)?;
    moderate(&mut market, body.skill_id, ModerationStatus::Rejected)?;
    Ok(Json(json!({ "message": format!("Skill rejected: {}", body.reason) })))
}

async fn list_messages(
    State(m): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Vec<PlatformMessage>> {
    let market = lock(&m);
    market.admin(&headers)?;
    Ok(Json(page(market.messages.clone(), &params)))
}

/// Echoes `is_active` as a string, the way the real service stores it.
async fn create_message(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewPlatformMessage>,
) -> Reply<Value> {
    let mut market = lock(&m);
    let admin = market.admin(&headers)?;
    let message = PlatformMessage {
        id: market.id(),
        title: body.title,
        message: body.message,
        message_type: body.message_type,
        is_active: true,
        created_at: Some("2026-01-04T09:00:00".to_string()),
        created_by: Some(admin),
    };
    market.messages.push(message.clone());

    let mut value = serde_json::to_value(&message).expect("message serializes");
    value["is_active"] = json!("true");
    Ok(Json(value))
}

async fn delete_message(
    State(m): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<Value> {
    let mut market = lock(&m);
    market.admin(&headers)?;
    let before = market.messages.len();
    market.messages.retain(|msg| msg.id != id);
    if market.messages.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Message not found"));
    }
    Ok(Json(json!({ "message": "Message deleted" })))
}

async fn report(
    State(m): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ReportRequest>,
) -> Result<Response, Fail> {
    let market = lock(&m);
    market.admin(&headers)?;
    let users: Vec<AdminUser> = market.accounts.iter().map(|a| market.admin_user(a)).collect();

    if body.format == ReportFormat::Csv {
        let mut csv = String::from("id,name,email\n");
        for u in &users {
            csv.push_str(&format!("{},{},{}\n", u.id, u.name, u.email));
        }
        return Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response());
    }
    Ok(Json(json!({ "report_type": body.report_type, "rows": users })).into_response())
}

// ============================================================================
// Test server
// ============================================================================

fn router(market: Shared) -> Router {
    let api = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/upload-photo", post(upload_photo))
        .route("/me", get(me))
        .route("/me/stats", get(my_stats))
        .route("/me/visibility", put(set_visibility))
        .route("/me/availability", put(set_availability))
        .route("/public-users", get(public_users))
        .route("/skills", get(list_skills).post(create_skill))
        .route("/skills/{id}", put(update_skill).delete(delete_skill))
        .route("/swaps", get(list_swaps).post(create_swap))
        .route("/swaps/{id}", delete(cancel_swap))
        .route("/swaps/{id}/accept", put(accept_swap))
        .route("/swaps/{id}/reject", put(reject_swap))
        .route("/swaps/{id}/complete", put(complete_swap))
        .route("/swaps/{id}/rate", post(rate_swap))
        .route("/swaps/{id}/ratings", get(swap_ratings))
        .route("/coins", get(coins))
        .route("/coins/add", post(add_coins))
        .route("/coins/deduct", post(deduct_coins))
        .route("/coins/check-swap-bonus", post(swap_bonus))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/users", get(admin_users))
        .route("/admin/users/ban", post(ban_user))
        .route("/admin/users/unban", post(unban_user))
        .route("/admin/skills", get(admin_skills))
        .route("/admin/skills/approve", post(approve_skill))
        .route("/admin/skills/reject", post(reject_skill))
        .route("/admin/swaps", get(admin_swaps))
        .route("/admin/messages", get(list_messages).post(create_message))
        .route("/admin/messages/{id}", delete(delete_message))
        .route("/admin/reports", post(report));

    Router::new().nest("/api/v1", api).with_state(market)
}

/// A running fake marketplace bound to a random port.
pub struct TestMarket {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Origin for [`ClientConfig`], e.g. `http://127.0.0.1:12345`.
    pub url: String,
    market: Shared,
    handle: JoinHandle<()>,
}

/// Spawn the fake marketplace.
pub async fn spawn_market() -> TestMarket {
    let market: Shared = Arc::new(Mutex::new(Market::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let app = router(Arc::clone(&market));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestMarket {
        addr,
        url,
        market,
        handle,
    }
}

impl TestMarket {
    /// A fresh client with its own in-memory session.
    pub fn client(&self) -> Client {
        Client::new(&ClientConfig::new(&self.url)).expect("client builds")
    }

    /// A client that opens a new connection per request, so requests fail
    /// as soon as the market is shut down.
    pub fn unpooled_client(&self) -> Client {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .expect("http client builds");
        let api = ApiClient::with_http(http, ClientConfig::new(&self.url).api_base());
        let session = Session::new(api, Arc::new(MemoryTokenStore::new()));
        Client::with_session(Arc::new(session))
    }

    /// Stop serving and wait until the listener is closed.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create an account with [`PASSWORD`].
    pub fn seed_user(&self, name: &str, email: &str) -> UserId {
        lock(&self.market).add_user(name, email, PASSWORD, false)
    }

    pub fn seed_admin(&self, name: &str, email: &str) -> UserId {
        lock(&self.market).add_user(name, email, PASSWORD, true)
    }

    pub fn seed_skill(
        &self,
        user_id: UserId,
        name: &str,
        skill_type: SkillType,
        level: SkillLevel,
    ) -> SkillId {
        let skill = NewSkill {
            name: name.to_string(),
            skill_type,
            level,
            description: None,
        };
        lock(&self.market).add_skill(user_id, &skill).id
    }

    pub fn coins_of(&self, user_id: UserId) -> i64 {
        lock(&self.market).account(user_id).map_or(0, |a| a.coins)
    }

    pub fn set_coins(&self, user_id: UserId, coins: i64) {
        if let Some(account) = lock(&self.market).account_mut(user_id) {
            account.coins = coins;
        }
    }

    pub fn is_banned(&self, user_id: UserId) -> bool {
        lock(&self.market)
            .account(user_id)
            .is_some_and(|a| a.user.is_banned)
    }

    pub fn skill_names(&self, user_id: UserId) -> Vec<String> {
        lock(&self.market)
            .skills
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn ratings(&self) -> Vec<Rating> {
        lock(&self.market).ratings.clone()
    }

    pub fn fail_skill_writes(&self, fail: bool) {
        lock(&self.market).fail_skill_writes = fail;
    }

    pub fn fail_swap_list(&self, fail: bool) {
        lock(&self.market).fail_swap_list = fail;
    }
}

/// Build a client and log it in as `email`.
pub async fn logged_in(market: &TestMarket, email: &str) -> Client {
    let client = market.client();
    client
        .session
        .login(&LoginForm::new(email, PASSWORD))
        .await
        .expect("login succeeds");
    client
}
