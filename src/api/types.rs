//! Request parameter types for the TweetDetail GraphQL endpoint.

use serde::Serialize;
use serde_json::{json, Value};

/// `variables` query parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailVariables {
    pub focal_tweet_id: String,
    #[serde(rename = "with_rux_injections")]
    pub with_rux_injections: bool,
    pub include_promoted_content: bool,
    pub with_community: bool,
    pub with_quick_promote_eligibility_tweet_fields: bool,
    pub with_birdwatch_notes: bool,
    pub with_voice: bool,
    #[serde(rename = "withV2Timeline")]
    pub with_v2_timeline: bool,
}

impl DetailVariables {
    pub fn for_record(record_id: &str) -> Self {
        Self {
            focal_tweet_id: record_id.to_string(),
            with_rux_injections: false,
            include_promoted_content: true,
            with_community: true,
            with_quick_promote_eligibility_tweet_fields: true,
            with_birdwatch_notes: true,
            with_voice: true,
            with_v2_timeline: true,
        }
    }
}

/// `features` query parameter, as sent by the web client.
pub fn detail_features() -> Value {
    json!({
        "rweb_lists_timeline_redesign_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "responsive_web_graphql_timeline_navigation_enabled": true,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "tweetypie_unmention_optimization_enabled": true,
        "responsive_web_edit_tweet_api_enabled": true,
        "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
        "view_counts_everywhere_api_enabled": true,
        "longform_notetweets_consumption_enabled": true,
        "responsive_web_twitter_article_tweet_consumption_enabled": false,
        "tweet_awards_web_tipping_enabled": false,
        "freedom_of_speech_not_reach_fetch_enabled": true,
        "standardized_nudges_misinfo": true,
        "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
        "longform_notetweets_rich_text_read_enabled": true,
        "longform_notetweets_inline_media_enabled": true,
        "responsive_web_media_download_video_enabled": false,
        "responsive_web_enhance_cards_enabled": false
    })
}
