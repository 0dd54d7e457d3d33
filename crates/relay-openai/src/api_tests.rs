    use super::*;

    #[test]
    fn test_create_assistant_request_serialization() {
        let request = AssistantRequest::with_file_search("gpt-4o-mini", "Librarian", "Answer from the docs");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["name"], "Librarian");
        assert_eq!(json["instructions"], "Answer from the docs");
        assert_eq!(json["tools"][0]["type"], "file_search");
        assert!(json.get("tool_resources").is_none());
    }

    #[test]
    fn test_attach_vector_stores_request_skips_other_fields() {
        let request = AssistantRequest::attach_vector_stores(vec!["vs_1".to_string()]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tool_resources"]["file_search"]["vector_store_ids"][0], "vs_1");
        assert!(json.get("model").is_none());
        assert!(json.get("name").is_none());
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_empty_name_and_instructions_are_sent() {
        let request = AssistantRequest::with_file_search("gpt-4o-mini", "", "");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "");
        assert_eq!(json["instructions"], "");
    }

    #[test]
    fn test_message_request_user() {
        let json = serde_json::to_value(MessageRequest::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_run_request_without_model() {
        let request = RunRequest {
            assistant_id: "asst_1".to_string(),
            model: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["assistant_id"], "asst_1");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_run_status_deserialization() {
        let cases = [
            ("queued", RunStatus::Queued),
            ("in_progress", RunStatus::InProgress),
            ("requires_action", RunStatus::RequiresAction),
            ("cancelling", RunStatus::Cancelling),
            ("cancelled", RunStatus::Cancelled),
            ("failed", RunStatus::Failed),
            ("completed", RunStatus::Completed),
            ("incomplete", RunStatus::Incomplete),
            ("expired", RunStatus::Expired),
            ("something_new", RunStatus::Unknown),
        ];
        for (raw, expected) in cases {
            let status: RunStatus = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(status, expected, "status {}", raw);
        }
    }

    #[test]
    fn test_run_status_terminal() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(!RunStatus::Cancelling.is_terminal());
        assert!(!RunStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_run_deserialization_with_error() {
        let json = serde_json::json!({
            "id": "run_1",
            "object": "thread.run",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "failed",
            "last_error": {"code": "server_error", "message": "Something broke"}
        });
        let run: Run = serde_json::from_value(json).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.last_error.unwrap().code, "server_error");
    }

    #[test]
    fn test_message_list_first_text() {
        let json = serde_json::json!({
            "object": "list",
            "data": [{
                "id": "msg_1",
                "object": "thread.message",
                "role": "assistant",
                "run_id": "run_1",
                "content": [{
                    "type": "text",
                    "text": {"value": "hello", "annotations": []}
                }]
            }],
            "first_id": "msg_1",
            "last_id": "msg_1",
            "has_more": false
        });
        let list: MessageList = serde_json::from_value(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].first_text(), Some("hello"));
        assert_eq!(list.data[0].run_id.as_deref(), Some("run_1"));
    }

    #[test]
    fn test_first_text_non_text_block() {
        let json = serde_json::json!({
            "id": "msg_2",
            "role": "assistant",
            "content": [{
                "type": "image_file",
                "image_file": {"file_id": "file_1"}
            }]
        });
        let message: ThreadMessage = serde_json::from_value(json).unwrap();
        assert!(matches!(message.content[0], MessageContent::Unsupported));
        assert_eq!(message.first_text(), None);
    }

    #[test]
    fn test_first_text_empty_content() {
        let json = serde_json::json!({"id": "msg_3", "role": "assistant", "content": []});
        let message: ThreadMessage = serde_json::from_value(json).unwrap();
        assert_eq!(message.first_text(), None);
    }

    #[test]
    fn test_file_upload_for_assistants() {
        let upload = FileUpload::for_assistants("data.txt", "some text");
        assert_eq!(upload.purpose, "assistants");
        assert_eq!(upload.bytes, b"some text".to_vec());
    }

    #[test]
    fn test_error_body_deserialization() {
        let json = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error", "code": null}}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.message, "Invalid API key");
        assert_eq!(body.error.error_type.as_deref(), Some("invalid_request_error"));
    }
