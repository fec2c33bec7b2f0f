//! Shared test utilities and fixtures.

use serde_json::{Value, json};

pub(crate) const SAMPLE_NZB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nzb PUBLIC "-//newzBin//DTD NZB 1.1//EN" "http://www.newzbin.com/DTD/nzb/nzb-1.1.dtd">
<nzb xmlns="http://www.newzbin.com/DTD/2003/nzb">
  <head>
    <meta type="name">Example.Nzb</meta>
  </head>
  <file poster="poster@example.com" date="1700000000" subject="example.bin (1/1)">
    <groups><group>alt.binaries.test</group></groups>
    <segments>
      <segment bytes="4096" number="1">abc123@example.com</segment>
    </segments>
  </file>
</nzb>
"#;

pub(crate) const HISTORY_JSON: &str = r#"{
  "version": "1.1",
  "result": [
    {
      "NZBID": 12,
      "Name": "First.Release",
      "Kind": "NZB",
      "Category": "movies",
      "Status": "SUCCESS/ALL",
      "HistoryTime": 1700000100,
      "FileSizeMB": 700,
      "DownloadTimeSec": 95,
      "ParStatus": "SUCCESS",
      "UnpackStatus": "SUCCESS",
      "DeleteStatus": "NONE",
      "MarkStatus": "NONE",
      "DestDir": "/downloads/movies/First.Release"
    },
    {
      "NZBID": 9,
      "Name": "Second.Release",
      "Kind": "NZB",
      "Category": "",
      "Status": "DELETED/MANUAL",
      "HistoryTime": 1700000000,
      "FileSizeMB": 120,
      "DownloadTimeSec": 0,
      "ParStatus": "NONE",
      "UnpackStatus": "NONE",
      "DeleteStatus": "MANUAL",
      "MarkStatus": "NONE",
      "DestDir": ""
    }
  ]
}"#;

pub(crate) fn status_json() -> Value {
    json!({
        "version": "1.1",
        "result": {
            "DownloadPaused": true,
            "Download2Paused": false,
            "DownloadRate": 1048576,
            "AverageDownloadRate": 524288,
            "RemainingSizeMB": 2048,
            "ThreadCount": 8,
            "UpTimeSec": 3600,
            "ServerTime": 1700000200
        }
    })
}

pub(crate) fn groups_json() -> Value {
    json!({
        "version": "1.1",
        "result": [
            {
                "NZBID": 3,
                "NZBName": "Queued.One",
                "Status": "DOWNLOADING",
                "MaxPriority": 0,
                "FileSizeMB": 300,
                "RemainingSizeMB": 100
            },
            {
                "NZBID": 4,
                "NZBName": "Queued.Two",
                "Status": "PAUSED",
                "MaxPriority": 900,
                "FileSizeMB": 50,
                "RemainingSizeMB": 50
            }
        ]
    })
}

pub(crate) fn body(value: &Value) -> Vec<u8> {
    value.to_string().into_bytes()
}
