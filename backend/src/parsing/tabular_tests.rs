#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::IngestError;
    use crate::logging::MemoryLog;
    use crate::parsing::tabular::{parse_tab_delimited, CellValue, TabularReader};
    use crate::storage::ScratchStore;

    const SAMPLE: &str = "Spectrum\tIn stats.\tX (mm)\tC\tO\n\
                          Spektrum 1 {1}\tYes\t-44.6\t80.36562\t17.7799\n\
                          Spektrum 2 {1}\tNo\t-12.0\t79.1\t\n";

    fn reader_with_log() -> (TabularReader, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        (TabularReader::new(".txt", log.clone()), log)
    }

    /// Test parsing a typical EDX export
    #[test]
    fn test_parse_sample_table() {
        let table = parse_tab_delimited(SAMPLE.as_bytes(), "sample").unwrap();

        assert_eq!(table.columns().len(), 5);
        assert_eq!(table.columns()[1], "In stats.");
        assert_eq!(table.len(), 2);

        let first = table.row(0).unwrap();
        assert_eq!(first.get("Spectrum").and_then(|v| v.as_str()), Some("Spektrum 1 {1}"));
        assert_eq!(first.get("X (mm)").and_then(|v| v.as_f64()), Some(-44.6));
        assert_eq!(first.get("C"), Some(&CellValue::Number(80.36562)));

        let second = table.row(1).unwrap();
        assert!(second.get("O").unwrap().is_empty());
        assert!(second.get("Missing").is_none());
    }

    #[test]
    fn test_minimal_scenario_table() {
        let table = parse_tab_delimited(b"MA\tElement\n1\tV\n", "scenario").unwrap();
        assert!(table.has_column("MA"));
        assert_eq!(table.column_index("Element"), Some(1));
        let records = table.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["MA"], CellValue::Number(1.0));
        assert_eq!(records[0]["Element"], CellValue::Text("V".to_string()));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_tab_delimited(b"MA\tElement\n", "header-only").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let table = parse_tab_delimited(b"A\tB\r\n\r\n1\t2\r\n\r\n3\t4\r\n", "crlf").unwrap();
        assert_eq!(table.len(), 2);
        let column: Vec<f64> = table
            .column("B")
            .unwrap()
            .into_iter()
            .filter_map(|v| v.as_f64())
            .collect();
        assert_eq!(column, vec![2.0, 4.0]);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse_tab_delimited(b"", "empty").unwrap_err();
        assert!(matches!(err, IngestError::MalformedTable { .. }));
        assert!(err.to_string().contains("missing header row"));
    }

    #[test]
    fn test_short_row_rejects_whole_table() {
        let err = parse_tab_delimited(b"A\tB\tC\n1\t2\t3\n4\t5\n", "short").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{}", msg);
        assert!(msg.contains("expected 3 fields, found 2"), "{}", msg);
        assert!(msg.contains("file=short"), "{}", msg);
    }

    #[test]
    fn test_long_row_rejects_whole_table() {
        let err = parse_tab_delimited(b"A\tB\n1\t2\t3\n", "long").unwrap_err();
        assert!(err.to_string().contains("expected 2 fields, found 3"));
    }

    #[test]
    fn test_duplicate_and_empty_header_names() {
        let dup = parse_tab_delimited(b"A\tA\n1\t2\n", "dup").unwrap_err();
        assert!(dup.to_string().contains("duplicate column name"));

        let blank = parse_tab_delimited(b"A\t\n1\t2\n", "blank").unwrap_err();
        assert!(blank.to_string().contains("column 1 has an empty name"));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let err = parse_tab_delimited(b"A\tB\n\xff\xfe\t1\n", "latin1").unwrap_err();
        assert_eq!(err.kind(), "MALFORMED_TABLE");
    }

    #[test]
    fn test_cell_typing() {
        assert_eq!(CellValue::parse(""), CellValue::Empty);
        assert_eq!(CellValue::parse("  "), CellValue::Empty);
        assert_eq!(CellValue::parse(" 6 "), CellValue::Number(6.0));
        assert_eq!(CellValue::parse("-0.4342265"), CellValue::Number(-0.4342265));
        assert_eq!(CellValue::parse("NaN"), CellValue::Text("NaN".to_string()));
        assert_eq!(CellValue::parse("1,5"), CellValue::Text("1,5".to_string()));
    }

    #[test]
    fn test_cell_serialization() {
        let json = serde_json::to_string(&vec![
            CellValue::Number(1.5),
            CellValue::Text("V".to_string()),
            CellValue::Empty,
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"V",null]"#);
    }

    #[tokio::test]
    async fn test_reader_parses_txt_upload() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path())
            .store(SAMPLE.as_bytes(), "run.txt")
            .await
            .unwrap();
        let (reader, log) = reader_with_log();

        let table = reader.read(&file).await.unwrap();
        assert_eq!(table.len(), 2);
        assert!(log.messages().is_empty());
    }

    #[tokio::test]
    async fn test_reader_rejects_other_suffix_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path())
            .store(SAMPLE.as_bytes(), "run.csv")
            .await
            .unwrap();
        let (reader, log) = reader_with_log();

        let err = reader.read(&file).await.unwrap_err();
        match err {
            IngestError::UnsupportedFormat { ref name } => assert_eq!(name, "run.csv"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        let messages = log.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error reading file "));
        assert!(messages[0].contains("run.csv"));
    }

    #[tokio::test]
    async fn test_reader_suffix_is_case_sensitive() {
        let (reader, _log) = reader_with_log();
        assert!(reader.accepts("a.txt"));
        assert!(!reader.accepts("a.TXT"));
        assert!(!reader.accepts("a.txt.bak"));
        assert_eq!(reader.suffix(), ".txt");
    }

    #[tokio::test]
    async fn test_reader_logs_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path())
            .store(b"A\tB\n1\n", "bad.txt")
            .await
            .unwrap();
        let (reader, log) = reader_with_log();

        assert!(reader.read(&file).await.is_err());
        let messages = log.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("expected 2 fields, found 1"));
        assert!(messages[0].contains(file.path().to_str().unwrap()));
    }

    #[tokio::test]
    async fn test_reader_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = ScratchStore::new(dir.path())
            .store(b"A\n1\n", "gone.txt")
            .await
            .unwrap();
        file.release();
        let (reader, log) = reader_with_log();

        let err = reader.read(&file).await.unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert_eq!(log.messages().len(), 1);
    }
}
