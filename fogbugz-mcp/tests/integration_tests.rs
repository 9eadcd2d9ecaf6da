//! End-to-end tests against mocked FogBugz and LLM endpoints

use fogbugz_mcp::mcp::responses::response_text;
use fogbugz_mcp::{AgentConfig, Config, FogBugzConfig, LlmProvider, McpServer};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be an object"),
    }
}

async fn mock_fogbugz() -> MockServer {
    let fogbugz = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.asp"))
        .and(query_param("cmd", "listWikis"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><wikis>\
             <wiki><ixWiki>1</ixWiki><sWiki>Engineering</sWiki><sTagLineHTML>Build and ship</sTagLineHTML><ixWikiPageRoot>20</ixWikiPageRoot></wiki>\
             <wiki><ixWiki>2</ixWiki><sWiki>Support</sWiki><sTagLineHTML>Customer help</sTagLineHTML><ixWikiPageRoot>30</ixWikiPageRoot></wiki>\
             </wikis></response>",
        ))
        .mount(&fogbugz)
        .await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "listArticles"))
        .and(query_param("ixWiki", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><articles>\
             <article><ixWikiPage>21</ixWikiPage><sHeadline>Deploying to production</sHeadline></article>\
             <article><ixWikiPage>22</ixWikiPage><sHeadline>Local development</sHeadline></article>\
             </articles></response>",
        ))
        .mount(&fogbugz)
        .await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "listArticles"))
        .and(query_param("ixWiki", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><articles>\
             <article><ixWikiPage>31</ixWikiPage><sHeadline>Refund policy</sHeadline></article>\
             </articles></response>",
        ))
        .mount(&fogbugz)
        .await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "viewArticle"))
        .and(query_param("ixWikiPage", "21"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><wikipage><sHeadline>Deploying to production</sHeadline>\
             <sBody><![CDATA[<h2>Steps</h2><ol><li>Run the release script</li><li>Watch the dashboards</li></ol>]]></sBody>\
             <nRevision>7</nRevision><tags><tag>deploy</tag></tags></wikipage></response>",
        ))
        .mount(&fogbugz)
        .await;

    fogbugz
}

fn tool_call_reply(id: &str, name: &str, arguments: Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": {"name": name, "arguments": arguments.to_string()}
                }]
            }
        }]
    })
}

#[tokio::test]
async fn test_search_then_view() {
    let fogbugz = mock_fogbugz().await;
    let config = Config {
        fogbugz: FogBugzConfig::new(fogbugz.uri(), "token"),
        search_limit: 10,
        agent: None,
    };
    let server = McpServer::new(&config).unwrap();

    let result = server
        .execute_tool("search_articles", args(json!({"query": "deploying production"})))
        .await
        .unwrap();
    let hits: Value = serde_json::from_str(&response_text(&result)).unwrap();
    assert_eq!(hits[0]["article_id"], 21);
    assert_eq!(hits[0]["wiki_name"], "Engineering");
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let result = server
        .execute_tool("view_article", args(json!({"article_id": 21})))
        .await
        .unwrap();
    let article: Value = serde_json::from_str(&response_text(&result)).unwrap();
    assert_eq!(
        article["content"],
        "## Steps\n\n1. Run the release script\n2. Watch the dashboards"
    );
    assert_eq!(article["tags"], json!(["deploy"]));
}

#[tokio::test]
async fn test_ask_agent_round_trip() {
    let fogbugz = mock_fogbugz().await;
    let llm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_reply(
            "call_1",
            "search_articles",
            json!({"query": "deploy"}),
        )))
        .with_priority(1)
        .up_to_n_times(1)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Deploying to production"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_reply(
            "call_2",
            "view_article",
            json!({"article_id": 21}),
        )))
        .with_priority(2)
        .up_to_n_times(1)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Run the release script"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Run the release script, then watch the dashboards."
                }
            }]
        })))
        .with_priority(3)
        .expect(1)
        .mount(&llm)
        .await;

    let config = Config {
        fogbugz: FogBugzConfig::new(fogbugz.uri(), "token"),
        search_limit: 10,
        agent: Some(AgentConfig {
            provider: LlmProvider::OpenAi,
            api_key: "sk-test".to_string(),
            endpoint: format!("{}/v1", llm.uri()),
            model: "gpt-4".to_string(),
            api_version: "2024-02-01".to_string(),
            max_iterations: 5,
        }),
    };
    let server = McpServer::new(&config).unwrap();

    let result = server
        .execute_tool("ask_agent", args(json!({"query": "How do I deploy?"})))
        .await
        .unwrap();
    assert_eq!(
        response_text(&result),
        "Run the release script, then watch the dashboards."
    );
}
