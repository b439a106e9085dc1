use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use analyze_api::analysis::analyzer::Analyzer;
use analyze_api::analysis::analyzer::pipeline::PipelineAnalyzer;
use analyze_api::analysis::attribute::{AttributeReflector, AttributeValue};
use analyze_api::analysis::stream::TokenStream;
use analyze_api::analysis::token::{IntoTokenIter, Token, TokenIter};
use analyze_api::analysis::token_filter::lowercase::LowercaseFilter;
use analyze_api::analysis::token_filter::synonym::SynonymFilter;
use analyze_api::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use analyze_api::analyze::batch::BatchProcessor;
use analyze_api::analyze::options::{AnalyzeDefaults, OutputOptions};
use analyze_api::analyze::resolver::{AnalyzerResolver, Analyzers, ResolvedAnalyzer};
use analyze_api::error::{AnalyzeError, RequestError, ResolutionError, Result};

type EventLog = Arc<Mutex<Vec<String>>>;

/// One scripted token: term, position increment and extra reflected attributes.
#[derive(Clone)]
struct ScriptedToken {
    term: &'static str,
    increment: usize,
    extras: Vec<(&'static str, AttributeValue)>,
}

fn token(term: &'static str, increment: usize) -> ScriptedToken {
    ScriptedToken {
        term,
        increment,
        extras: Vec::new(),
    }
}

/// Analyzer that replays a fixed token script and logs the stream lifecycle.
struct ScriptedAnalyzer {
    name: &'static str,
    script: Vec<ScriptedToken>,
    fail_after: Option<usize>,
    events: EventLog,
}

impl ScriptedAnalyzer {
    fn new(name: &'static str, script: Vec<ScriptedToken>, events: &EventLog) -> Self {
        ScriptedAnalyzer {
            name,
            script,
            fail_after: None,
            events: events.clone(),
        }
    }

    fn failing_after(mut self, tokens: usize) -> Self {
        self.fail_after = Some(tokens);
        self
    }
}

impl Analyzer for ScriptedAnalyzer {
    fn analyze(&self, _text: &str) -> Result<TokenIter> {
        let tokens: Vec<Token> = self
            .script
            .iter()
            .map(|t| Token::new(t.term).with_position_increment(t.increment))
            .collect();
        Ok(tokens.into_token_iter())
    }

    fn name(&self) -> &str {
        self.name
    }

    fn token_stream(&self, _text: &str) -> Result<Box<dyn TokenStream>> {
        self.events.lock().push(format!("{}:open", self.name));
        Ok(Box::new(ScriptedStream {
            name: self.name,
            script: self.script.clone(),
            emitted: 0,
            fail_after: self.fail_after,
            closed: false,
            events: self.events.clone(),
        }))
    }
}

struct ScriptedStream {
    name: &'static str,
    script: Vec<ScriptedToken>,
    emitted: usize,
    fail_after: Option<usize>,
    closed: bool,
    events: EventLog,
}

impl ScriptedStream {
    fn current(&self) -> &ScriptedToken {
        &self.script[self.emitted - 1]
    }

    fn log(&self, event: &str) {
        self.events.lock().push(format!("{}:{event}", self.name));
    }
}

impl TokenStream for ScriptedStream {
    fn reset(&mut self) -> Result<()> {
        self.log("reset");
        Ok(())
    }

    fn increment_token(&mut self) -> Result<bool> {
        if self.fail_after == Some(self.emitted) {
            self.log("fail");
            return Err(AnalyzeError::analysis("scripted pipeline failure"));
        }
        if self.emitted == self.script.len() {
            return Ok(false);
        }
        self.emitted += 1;
        Ok(true)
    }

    fn term(&self) -> &str {
        self.current().term
    }

    fn position_increment(&self) -> usize {
        self.current().increment
    }

    fn reflect_with(&self, reflector: &mut dyn AttributeReflector) {
        for (key, value) in &self.current().extras {
            reflector.reflect("ScriptedAttribute", key, value.clone());
        }
    }

    fn end(&mut self) -> Result<()> {
        self.log("end");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.log("close");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Resolver that records every lookup and delegates to a real registry.
struct RecordingResolver {
    inner: Analyzers,
    lookups: Mutex<Vec<(Option<String>, String)>>,
}

impl AnalyzerResolver for RecordingResolver {
    fn resolve(
        &self,
        corpus: Option<&str>,
        analyzer: &str,
    ) -> std::result::Result<ResolvedAnalyzer, ResolutionError> {
        self.lookups
            .lock()
            .push((corpus.map(str::to_string), analyzer.to_string()));
        self.inner.resolve(corpus, analyzer)
    }
}

fn scripted_processor(analyzers: Vec<ScriptedAnalyzer>) -> Result<BatchProcessor> {
    let registry = Analyzers::with_builtins()?;
    for analyzer in analyzers {
        registry.global().register(analyzer.name, Arc::new(analyzer));
    }
    Ok(BatchProcessor::new(Arc::new(registry)))
}

fn positions(response: &analyze_api::analyze::AnalyzeBatchResponse, name: &str) -> Vec<Option<usize>> {
    response
        .get(name)
        .map(|tokens| tokens.iter().map(|t| t.position).collect())
        .unwrap_or_default()
}

#[test]
fn single_request_preserves_emission_order() -> Result<()> {
    let events = EventLog::default();
    let processor = scripted_processor(vec![ScriptedAnalyzer::new(
        "scripted",
        vec![token("zulu", 1), token("alpha", 1), token("mike", 1)],
        &events,
    )])?;

    let response = processor.process(
        br#"{"only": {"analyzer": "scripted", "text": "ignored"}}"#,
        &AnalyzeDefaults::new(),
        &OutputOptions::new(),
    )?;

    assert_eq!(response.names(), vec!["only"]);
    let terms: Vec<&str> = response.get("only").unwrap().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["zulu", "alpha", "mike"]);
    Ok(())
}

#[test]
fn positions_accumulate_from_increments() -> Result<()> {
    let events = EventLog::default();
    let processor = scripted_processor(vec![ScriptedAnalyzer::new(
        "stacked",
        vec![token("a", 1), token("b", 1), token("b2", 0), token("d", 2)],
        &events,
    )])?;

    let response = processor.process(
        br#"{"q": {"analyzer": "stacked", "text": "ignored"}}"#,
        &AnalyzeDefaults::new(),
        &OutputOptions::new().enable("position"),
    )?;

    assert_eq!(positions(&response, "q"), vec![Some(1), Some(2), Some(2), Some(4)]);
    assert_eq!(
        *events.lock(),
        vec!["stacked:open", "stacked:reset", "stacked:end", "stacked:close"]
    );
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<()> {
    let processor = BatchProcessor::new(Arc::new(Analyzers::with_builtins()?));
    let body = br#"{"q": {"analyzer": "standard", "text": "The quick brown fox and the lazy dog"}}"#;
    let options = OutputOptions::new().enable("position");

    let first = processor.process(body, &AnalyzeDefaults::new(), &options)?;
    let second = processor.process(body, &AnalyzeDefaults::new(), &options)?;

    assert_eq!(first, second);
    assert_eq!(first.to_json(false)?, second.to_json(false)?);
    Ok(())
}

#[test]
fn defaults_fill_missing_corpus_and_analyzer() -> Result<()> {
    let inner = Analyzers::with_builtins()?;
    inner.register_corpus(inner.corpus("products"));
    let resolver = Arc::new(RecordingResolver {
        inner,
        lookups: Mutex::new(Vec::new()),
    });
    let processor = BatchProcessor::new(resolver.clone());
    let defaults = AnalyzeDefaults::new()
        .with_corpus("products")
        .with_analyzer("standard");

    let response = processor.process(
        br#"{"q": {"text": "hello world"}}"#,
        &defaults,
        &OutputOptions::new(),
    )?;

    assert_eq!(
        *resolver.lookups.lock(),
        vec![(Some("products".to_string()), "standard".to_string())]
    );
    assert_eq!(response.get("q").unwrap().len(), 2);
    Ok(())
}

#[test]
fn missing_analyzer_rejects_the_batch() -> Result<()> {
    let events = EventLog::default();
    let processor = scripted_processor(vec![ScriptedAnalyzer::new(
        "scripted",
        vec![token("a", 1)],
        &events,
    )])?;

    let result = processor.process(
        br#"{"ok": {"analyzer": "scripted", "text": "x"}, "broken": {"corpus": "products"}}"#,
        &AnalyzeDefaults::new(),
        &OutputOptions::new(),
    );

    match result {
        Err(AnalyzeError::Request(RequestError::MissingAnalyzer { name })) => {
            assert_eq!(name, "broken");
        }
        other => panic!("expected MissingAnalyzer, got {other:?}"),
    }
    Ok(())
}

#[test]
fn attribute_flags_select_projected_fields() -> Result<()> {
    let events = EventLog::default();
    let script = vec![ScriptedToken {
        term: "fox",
        increment: 1,
        extras: vec![
            ("PositionLength", AttributeValue::Integer(2)),
            ("Offset", AttributeValue::Integer(10)),
            ("termBytes", AttributeValue::Bytes(b"fox".to_vec())),
        ],
    }];
    let processor = scripted_processor(vec![ScriptedAnalyzer::new("scripted", script, &events)])?;
    let body = br#"{"q": {"analyzer": "scripted", "text": "fox"}}"#;

    let enabled = OutputOptions::from_params([
        ("position_length", "true"),
        ("offset", ""),
        ("term_bytes", "yes"),
    ]);
    let response = processor.process(body, &AnalyzeDefaults::new(), &enabled)?;
    let record = &response.get("q").unwrap()[0];
    assert_eq!(record.attribute("position_length"), Some(&Value::from(2)));
    assert_eq!(record.attribute("offset"), Some(&Value::from(10)));
    assert_eq!(record.attribute("term_bytes"), Some(&Value::from("[66 6f 78]")));

    for options in [
        OutputOptions::new(),
        OutputOptions::from_params([("position_length", "false")]),
        OutputOptions::from_params([("PositionLength", "true")]),
    ] {
        let response = processor.process(body, &AnalyzeDefaults::new(), &options)?;
        assert_eq!(response.get("q").unwrap()[0].attribute("position_length"), None);
    }
    Ok(())
}

#[test]
fn response_keys_follow_request_order() -> Result<()> {
    let processor = BatchProcessor::new(Arc::new(Analyzers::with_builtins()?));

    let response = processor.process(
        br#"{"b": {"analyzer": "keyword", "text": "second"}, "a": {"analyzer": "keyword", "text": "first"}}"#,
        &AnalyzeDefaults::new(),
        &OutputOptions::new(),
    )?;

    assert_eq!(response.names(), vec!["b", "a"]);
    assert_eq!(
        response.to_json(false)?,
        r#"{"b":[{"term":"second"}],"a":[{"term":"first"}]}"#
    );
    Ok(())
}

#[test]
fn failing_stream_is_released_and_stops_the_batch() -> Result<()> {
    let events = EventLog::default();
    let processor = scripted_processor(vec![
        ScriptedAnalyzer::new("flaky", vec![token("a", 1), token("b", 1)], &events).failing_after(1),
        ScriptedAnalyzer::new("steady", vec![token("c", 1)], &events),
    ])?;

    let err = processor
        .process(
            br#"{"first": {"analyzer": "flaky", "text": "x"}, "second": {"analyzer": "steady", "text": "y"}}"#,
            &AnalyzeDefaults::new(),
            &OutputOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::Analysis(_)));
    assert_eq!(err.status(), 500);
    assert_eq!(
        *events.lock(),
        vec!["flaky:open", "flaky:reset", "flaky:fail", "flaky:end", "flaky:close"]
    );
    Ok(())
}

#[test]
fn synonyms_share_a_position() -> Result<()> {
    let registry = Analyzers::with_builtins()?;
    let pipeline = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
        .add_filter(Arc::new(LowercaseFilter::new()))
        .add_filter(Arc::new(SynonymFilter::new().with_synonyms("quick", ["fast", "speedy"])))
        .with_name("synonyms");
    registry.global().register("synonyms", Arc::new(pipeline));
    let processor = BatchProcessor::new(Arc::new(registry));

    let options = OutputOptions::from_params([("position", ""), ("type", ""), ("original_text", "")]);
    let response = processor.process(
        br#"{"q": {"analyzer": "synonyms", "text": "Quick fox"}}"#,
        &AnalyzeDefaults::new(),
        &options,
    )?;

    let tokens = response.get("q").unwrap();
    let terms: Vec<&str> = tokens.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["quick", "fast", "speedy", "fox"]);
    assert_eq!(positions(&response, "q"), vec![Some(1), Some(1), Some(1), Some(2)]);
    assert_eq!(tokens[1].attribute("type"), Some(&Value::from("SYNONYM")));
    assert_eq!(tokens[1].attribute("original_text"), Some(&Value::from("quick")));
    assert_eq!(tokens[0].attribute("original_text"), None);
    Ok(())
}

#[test]
fn corpus_errors_are_reported_per_request() -> Result<()> {
    let analyzers = Analyzers::with_builtins()?;
    analyzers.register_corpus(analyzers.corpus("products"));
    let processor = BatchProcessor::new(Arc::new(analyzers));

    let err = processor
        .process(
            br#"{"q": {"index": "orders", "analyzer": "standard", "text": "x"}}"#,
            &AnalyzeDefaults::new(),
            &OutputOptions::new(),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Request error: corpus [orders] of request [q] is missing"
    );

    let err = processor
        .process(
            br#"{"q": {"corpus": "products", "analyzer": "fancy", "text": "x"}}"#,
            &AnalyzeDefaults::new(),
            &OutputOptions::new(),
        )
        .unwrap_err();
    assert_eq!(
        err.to_envelope().error.reason,
        "Resolution error in request [q]: unknown analyzer [fancy] in corpus [products]"
    );
    assert_eq!(err.status(), 400);
    Ok(())
}
