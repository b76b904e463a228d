//! End-to-end sink task scenarios against the scripted client.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use volt_connect::{
    keys, ConnectorConfig, FieldKind, FieldSchema, FieldValue, LogicalType, RecordSchema,
    ResponseStatus, SinkError, SinkRecord, SinkTask, SqlValue, StructValue,
};
use volt_client::testing::{CallScript, ScriptedClient};
use volt_client::{ConnectionEvent, DisconnectCause};

fn test_config() -> ConnectorConfig {
    let mut props = HashMap::new();
    props.insert(keys::SERVERS.to_string(), "h1:21212,h2:21212".to_string());
    props.insert(keys::PROCEDURE.to_string(), "Insert".to_string());
    // Keep drain budgets short so rejection paths settle quickly.
    props.insert(keys::RESPONSE_TIMEOUT_MAX.to_string(), "200".to_string());
    ConnectorConfig::from_props(&props).unwrap()
}

fn csv_record(partition: i32, offset: i64, line: &str) -> SinkRecord {
    SinkRecord::from_bytes(partition, offset, line.as_bytes().to_vec())
}

fn offsets(partition: i32, next: i64) -> HashMap<i32, i64> {
    HashMap::from([(partition, next)])
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_batch_of_valid_records_checkpoints() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();
    assert_eq!(client.connections(), vec!["h1:21212", "h2:21212"]);

    let batch = vec![
        csv_record(0, 0, "1,alice,2.5").with_key(b"k1".to_vec()),
        csv_record(0, 1, "2,bob,3.5"),
        csv_record(0, 2, "3,carol,4.5"),
    ];
    task.submit_batch(&batch).await.unwrap();

    let invocations = client.invocations();
    assert_eq!(invocations.len(), 3);
    assert!(invocations.iter().all(|i| i.procedure == "Insert"));
    assert_eq!(
        invocations[0].args,
        vec![
            SqlValue::Text("1".to_string()),
            SqlValue::Text("alice".to_string()),
            SqlValue::Text("2.5".to_string()),
        ]
    );

    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(0, 3)).await.unwrap();
    assert_eq!(task.batch_count(), 0);
}

#[tokio::test]
async fn test_malformed_record_skipped_rest_succeeds() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    let batch = vec![
        csv_record(0, 0, "1,alice,2.5"),
        SinkRecord::from_bytes(0, 1, vec![0xff, 0xfe]),
        csv_record(0, 2, "3,carol,4.5"),
    ];
    task.submit_batch(&batch).await.unwrap();

    // The malformed record never reached the client, but it still counts
    // toward the batch.
    assert_eq!(client.invocations().len(), 2);
    assert_eq!(task.batch_count(), 3);

    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(0, 3)).await.unwrap();
    assert_eq!(task.batch_count(), 0);
}

#[tokio::test]
async fn test_connection_loss_aborts_batch_and_clears_tracker() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    // First sub-batch is accepted but held unacknowledged.
    client.script_call(CallScript::Hold);
    client.script_call(CallScript::Hold);
    task.submit_batch(&[csv_record(0, 0, "1,a,1"), csv_record(0, 1, "2,b,2")])
        .await
        .unwrap();
    assert_eq!(task.in_flight(), 2);

    // Every redundant connection goes away.
    client.emit(ConnectionEvent::Lost {
        host: "h1:21212".to_string(),
        remaining: 0,
        cause: DisconnectCause::Closed,
    });
    // Give the monitor's event task a moment to observe the loss.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = task
        .submit_batch(&[csv_record(0, 2, "3,c,3"), csv_record(0, 3, "4,d,4")])
        .await
        .unwrap_err();
    assert!(err.is_retriable(), "expected a retriable signal, got {err}");

    // Nothing further was submitted and the tracker is empty right away.
    assert_eq!(client.invocations().len(), 2);
    assert_eq!(task.in_flight(), 0);
    assert_eq!(task.batch_count(), 0);

    // Stale completions from the abandoned batch are harmless no-ops.
    client.release_held();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(task.in_flight(), 0);
}

#[tokio::test]
async fn test_checkpoint_rejected_while_writes_outstanding() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    client.script_call(CallScript::Complete {
        status: ResponseStatus::Success,
        delay: Duration::ZERO,
    });
    client.script_call(CallScript::Complete {
        status: ResponseStatus::Success,
        delay: Duration::ZERO,
    });
    client.script_call(CallScript::Hold);
    client.script_call(CallScript::Hold);

    let batch: Vec<_> = (0..4).map(|i| csv_record(0, i, "1,a,1")).collect();
    task.submit_batch(&batch).await.unwrap();
    wait_until(|| task.in_flight() == 2).await;

    let err = task.request_checkpoint(&offsets(0, 4)).await.unwrap_err();
    assert!(
        matches!(err, SinkError::Uncommitted { outstanding: 2 }),
        "unexpected error: {err}"
    );

    // The attempt reset the counter and dropped the stale keys so the
    // host can replay from the last committed offset.
    assert_eq!(task.batch_count(), 0);
    assert_eq!(task.in_flight(), 0);

    client.release_held();
}

#[tokio::test]
async fn test_checkpoint_with_empty_batch_is_noop() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    task.submit_batch(&[csv_record(0, 0, "1,a,1")]).await.unwrap();
    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(0, 1)).await.unwrap();

    // Nothing accepted since the last checkpoint: returns immediately.
    let started = Instant::now();
    task.request_checkpoint(&offsets(0, 1)).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(50));
}

#[tokio::test]
async fn test_checkpoint_fails_fast_when_connection_lost() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    task.submit_batch(&[csv_record(0, 0, "1,a,1")]).await.unwrap();
    client.emit(ConnectionEvent::Lost {
        host: "h1:21212".to_string(),
        remaining: 0,
        cause: DisconnectCause::Timeout,
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let started = Instant::now();
    let err = task.request_checkpoint(&offsets(0, 1)).await.unwrap_err();
    assert!(matches!(err, SinkError::ConnectionLost));
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_local_rejection_is_soft() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    client.script_call(CallScript::Reject);
    task.submit_batch(&[csv_record(0, 0, "1,a,1"), csv_record(0, 1, "2,b,2")])
        .await
        .unwrap();

    // The rejected record was unregistered immediately; the second one
    // went through.
    assert_eq!(client.invocations().len(), 2);
    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(0, 2)).await.unwrap();
}

#[tokio::test]
async fn test_no_connections_mid_batch_aborts() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    client.script_call(CallScript::Complete {
        status: ResponseStatus::Success,
        delay: Duration::ZERO,
    });
    client.script_call(CallScript::FailNoConnections);

    let batch: Vec<_> = (0..3).map(|i| csv_record(0, i, "1,a,1")).collect();
    let err = task.submit_batch(&batch).await.unwrap_err();
    assert!(err.is_retriable());

    // The third record was never attempted.
    assert_eq!(client.invocations().len(), 2);
    assert_eq!(task.in_flight(), 0);
    assert_eq!(task.batch_count(), 0);
}

#[tokio::test]
async fn test_connection_lost_response_still_settles_the_write() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    client.script_call(CallScript::Complete {
        status: ResponseStatus::ConnectionLost,
        delay: Duration::ZERO,
    });
    task.submit_batch(&[csv_record(0, 0, "1,a,1")]).await.unwrap();

    // A lost/timeout status resolves the key rather than leaving it
    // pending forever, so checkpoint progress is preserved.
    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(0, 1)).await.unwrap();
}

#[tokio::test]
async fn test_schema_typed_records_marshal_through() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    let schema = RecordSchema::new(vec![
        FieldSchema::new("id", FieldKind::Int64),
        FieldSchema::new("name", FieldKind::String),
        FieldSchema::new("created", FieldKind::Int64).with_logical(LogicalType::Timestamp),
    ]);
    let value = StructValue::new(
        schema,
        vec![
            FieldValue::Int64(7),
            FieldValue::String("seven".to_string()),
            FieldValue::Int64(1_718_451_045_000),
        ],
    );
    task.submit_batch(&[SinkRecord::from_struct(2, 9, value)])
        .await
        .unwrap();

    let invocations = client.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].args[0], SqlValue::BigInt(7));
    assert_eq!(invocations[0].args[1], SqlValue::Text("seven".to_string()));
    let expected =
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(1_718_451_045_000).unwrap();
    assert_eq!(invocations[0].args[2], SqlValue::Timestamp(expected));

    wait_until(|| task.in_flight() == 0).await;
    task.request_checkpoint(&offsets(2, 10)).await.unwrap();
}

#[tokio::test]
async fn test_boolean_field_skips_record() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    let schema = RecordSchema::new(vec![FieldSchema::new("active", FieldKind::Boolean)]);
    let value = StructValue::new(schema, vec![FieldValue::Bool(true)]);
    task.submit_batch(&[SinkRecord::from_struct(0, 0, value)])
        .await
        .unwrap();

    // Record-level failure: skipped, never submitted, batch continues.
    assert!(client.invocations().is_empty());
    assert_eq!(task.batch_count(), 1);
}

#[tokio::test]
async fn test_unknown_strategy_fails_startup() {
    let mut props = HashMap::new();
    props.insert(keys::SERVERS.to_string(), "h1:21212".to_string());
    props.insert(keys::PROCEDURE.to_string(), "Insert".to_string());
    props.insert(keys::FORMATTER_FACTORY.to_string(), "fixedwidth".to_string());
    let config = ConnectorConfig::from_props(&props).unwrap();

    let err = SinkTask::start(config, ScriptedClient::new())
        .await
        .err()
        .expect("startup must fail for an unknown strategy");
    assert!(matches!(err, SinkError::Config(_)));
}

#[tokio::test]
async fn test_unreachable_server_fails_startup() {
    let client = ScriptedClient::new();
    client.refuse_connections();
    let err = SinkTask::start(test_config(), client)
        .await
        .err()
        .expect("startup must fail when a server is unreachable");
    assert!(matches!(err, SinkError::Client(_)));
}

#[tokio::test]
async fn test_stop_releases_client_despite_held_writes() {
    let client = ScriptedClient::new();
    let task = SinkTask::start(test_config(), client.clone()).await.unwrap();

    client.script_call(CallScript::Hold);
    task.submit_batch(&[csv_record(0, 0, "1,a,1")]).await.unwrap();

    // The held write keeps drain from settling; shutdown must still
    // bound the wait and release the client.
    let started = Instant::now();
    task.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(client.is_closed());
}
