//! Canned payloads served when a degrading resource cannot be fetched.
//!
//! Timestamps are relative to `now` so the dashboard shows sensible ages.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

fn ago(now: DateTime<Utc>, delta: Duration) -> String {
    (now - delta).to_rfc3339()
}

/// Three posts, `mock-1` through `mock-3`.
pub fn posts(now: DateTime<Utc>) -> Value {
    json!({
        "success": true,
        "data": [
            {
                "id": "mock-1",
                "tweet_content": "Just announced a major breakthrough in renewable energy technology. This could revolutionize the entire sector! $TSLA $ENPH #CleanEnergy",
                "submitted_at": ago(now, Duration::hours(2)),
                "status": "completed",
                "market_effect": true
            },
            {
                "id": "mock-2",
                "tweet_content": "Federal Reserve hints at potential interest rate changes in upcoming meeting. Markets are already responding. $SPY $QQQ",
                "submitted_at": ago(now, Duration::hours(4)),
                "status": "completed",
                "market_effect": true
            },
            {
                "id": "mock-3",
                "tweet_content": "New AI chip announcement from major tech company shows 40% performance improvement over previous generation. $NVDA $AMD",
                "submitted_at": ago(now, Duration::hours(6)),
                "status": "processing",
                "market_effect": false
            }
        ]
    })
}

fn queued_rows(now: DateTime<Utc>) -> Vec<Value> {
    vec![
        json!({
            "id": "queued-1",
            "tweet_id": "mock-1",
            "ticker": "TSLA",
            "dollar_amount": 5000,
            "days_to_hold": 7,
            "reasoning": "Strong positive sentiment around renewable energy breakthrough announcement. Technical indicators show bullish momentum with high social media engagement.",
            "queued_at": ago(now, Duration::minutes(30))
        }),
        json!({
            "id": "queued-2",
            "tweet_id": "mock-2",
            "ticker": "SPY",
            "dollar_amount": 3000,
            "days_to_hold": 3,
            "reasoning": "Federal Reserve policy changes typically create short-term volatility opportunities. Market positioning suggests upward movement likely.",
            "queued_at": ago(now, Duration::minutes(45))
        }),
        json!({
            "id": "queued-3",
            "tweet_id": "mock-3",
            "ticker": "NVDA",
            "dollar_amount": 7500,
            "days_to_hold": 14,
            "reasoning": "AI chip performance improvements drive significant market value. Historical patterns show sustained growth following major tech announcements.",
            "queued_at": ago(now, Duration::minutes(60))
        }),
    ]
}

fn executed_rows(now: DateTime<Utc>) -> Vec<Value> {
    vec![
        json!({
            "id": "executed-1",
            "tweet_id": "mock-1",
            "ticker": "ENPH",
            "dollar_amount": 4200,
            "days_to_hold": 5,
            "reasoning": "Clean energy sector momentum following renewable technology breakthrough. Strong institutional buying patterns observed.",
            "executed_at": ago(now, Duration::days(2)),
            "execution_price": 142.5
        }),
        json!({
            "id": "executed-2",
            "tweet_id": "mock-2",
            "ticker": "QQQ",
            "dollar_amount": 6800,
            "days_to_hold": 2,
            "reasoning": "Tech-heavy ETF positioned well for Fed policy changes. Options flow indicates bullish sentiment among institutional traders.",
            "executed_at": ago(now, Duration::days(1)),
            "execution_price": 398.75
        }),
        json!({
            "id": "executed-3",
            "tweet_id": "mock-3",
            "ticker": "AMD",
            "dollar_amount": 3500,
            "days_to_hold": 10,
            "reasoning": "Semiconductor competition heating up with new AI chip announcements. AMD positioned as value play in growing market.",
            "executed_at": ago(now, Duration::days(3)),
            "execution_price": 156.2
        }),
    ]
}

fn for_post(rows: Vec<Value>, post_id: &str) -> Vec<Value> {
    rows.into_iter()
        .filter(|row| row["tweet_id"] == post_id)
        .collect()
}

pub fn queued_trades(now: DateTime<Utc>) -> Value {
    json!({ "success": true, "data": queued_rows(now) })
}

pub fn executed_trades(now: DateTime<Utc>) -> Value {
    json!({ "success": true, "data": executed_rows(now) })
}

pub fn queued_trades_for(post_id: &str, now: DateTime<Utc>) -> Value {
    json!({ "success": true, "data": for_post(queued_rows(now), post_id) })
}

pub fn executed_trades_for(post_id: &str, now: DateTime<Utc>) -> Value {
    json!({ "success": true, "data": for_post(executed_rows(now), post_id) })
}

/// Mock author directory; unknown ids yield `data: null`.
pub fn author(author_id: &str) -> Value {
    let known = [
        (
            "1",
            "elonmusk",
            "Elon Musk",
            "CEO of Tesla and SpaceX, known for market-moving tweets about technology and crypto",
        ),
        (
            "2",
            "cathiedwood",
            "Cathie Wood",
            "CEO of ARK Invest, focuses on disruptive innovation investments",
        ),
        (
            "3",
            "chamath",
            "Chamath Palihapitiya",
            "Venture capitalist and former Facebook executive, known for SPAC investments",
        ),
    ];

    let data = known
        .iter()
        .find(|(id, ..)| *id == author_id)
        .map(|(id, handle, name, context)| {
            json!({
                "id": id,
                "platform_id": handle,
                "name": name,
                "author_context": context,
                "created_at": "2024-01-01T00:00:00Z",
                "platform": "twitter"
            })
        })
        .unwrap_or(Value::Null);

    json!({ "success": true, "data": data })
}
