#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::JoinHandle;

use zip::write::SimpleFileOptions;

// -- Zip --

/// Build an in-memory zip holding `entries` as (path, contents).
pub fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A zip with a single `.nfo` file carrying `nfo`.
pub fn game_zip(nfo: &str) -> Vec<u8> {
    make_zip(&[("GAME.NFO", nfo.as_bytes()), ("GAME.PRG", b"\x01\x08")])
}

// -- ISO 9660 --

#[derive(Default)]
struct TreeDir {
    lba: u32,
    dirs: BTreeMap<String, TreeDir>,
    files: BTreeMap<String, (u32, Vec<u8>)>,
}

impl TreeDir {
    fn insert(&mut self, path: &str, data: Vec<u8>) {
        let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let file = parts.pop().unwrap();
        let mut dir = self;
        for part in parts {
            dir = dir.dirs.entry(part.to_string()).or_default();
        }
        dir.files.insert(file.to_string(), (0, data));
    }

    fn assign(&mut self, next: &mut u32) {
        self.lba = *next;
        *next += self.dir_sectors();
        for (lba, data) in self.files.values_mut() {
            *lba = *next;
            *next += data.len().div_ceil(2048).max(1) as u32;
        }
        for dir in self.dirs.values_mut() {
            dir.assign(next);
        }
    }

    fn records(&self, parent_lba: u32) -> Vec<Vec<u8>> {
        let mut records = vec![
            dir_record(&[0x00], self.lba, self.dir_sectors() * 2048, 0x02),
            dir_record(&[0x01], parent_lba, 2048, 0x02),
        ];
        for (name, dir) in &self.dirs {
            records.push(dir_record(name.as_bytes(), dir.lba, dir.dir_sectors() * 2048, 0x02));
        }
        for (name, (lba, data)) in &self.files {
            let id = format!("{name};1");
            records.push(dir_record(id.as_bytes(), *lba, data.len() as u32, 0));
        }
        records
    }

    /// Sectors needed for this directory's records (records never straddle sectors).
    fn dir_sectors(&self) -> u32 {
        let mut lens = vec![record_len(1), record_len(1)];
        lens.extend(self.dirs.keys().map(|name| record_len(name.len())));
        lens.extend(self.files.keys().map(|name| record_len(name.len() + 2)));

        let mut sectors = 1;
        let mut used = 0;
        for len in lens {
            if used + len > 2048 {
                sectors += 1;
                used = 0;
            }
            used += len;
        }
        sectors
    }

    fn write(&self, parent_lba: u32, image: &mut [u8]) {
        let mut pos = self.lba as usize * 2048;
        let mut sector_end = pos + 2048;
        for record in self.records(parent_lba) {
            if pos + record.len() > sector_end {
                pos = sector_end;
                sector_end += 2048;
            }
            image[pos..pos + record.len()].copy_from_slice(&record);
            pos += record.len();
        }
        for (lba, data) in self.files.values() {
            let start = *lba as usize * 2048;
            image[start..start + data.len()].copy_from_slice(data);
        }
        for dir in self.dirs.values() {
            dir.write(self.lba, image);
        }
    }
}

fn record_len(id_len: usize) -> usize {
    33 + id_len + ((id_len + 1) % 2)
}

fn dir_record(id: &[u8], extent_lba: u32, data_length: u32, flags: u8) -> Vec<u8> {
    let id_len = id.len();
    let len = record_len(id_len);
    let mut record = vec![0u8; len];
    record[0] = len as u8;
    record[2..6].copy_from_slice(&extent_lba.to_le_bytes());
    record[6..10].copy_from_slice(&extent_lba.to_be_bytes());
    record[10..14].copy_from_slice(&data_length.to_le_bytes());
    record[14..18].copy_from_slice(&data_length.to_be_bytes());
    record[25] = flags;
    record[32] = id_len as u8;
    record[33..33 + id_len].copy_from_slice(id);
    record
}

/// Build a 2048-byte/sector ISO 9660 image holding `files` (absolute paths).
pub fn make_iso(files: Vec<(String, Vec<u8>)>) -> Vec<u8> {
    let mut root = TreeDir::default();
    for (path, data) in files {
        root.insert(&path, data);
    }
    let mut next = 18;
    root.assign(&mut next);

    let mut image = vec![0u8; next as usize * 2048];

    let pvd = &mut image[16 * 2048..17 * 2048];
    pvd[0] = 0x01;
    pvd[1..6].copy_from_slice(b"CD001");
    pvd[6] = 0x01;
    pvd[40..72].copy_from_slice(&[b' '; 32]);
    pvd[40..48].copy_from_slice(b"GAMEBASE");
    pvd[80..84].copy_from_slice(&next.to_le_bytes());
    let root_record = dir_record(&[0x00], root.lba, root.dir_sectors() * 2048, 0x02);
    pvd[156..156 + root_record.len()].copy_from_slice(&root_record);

    let terminator = &mut image[17 * 2048..18 * 2048];
    terminator[0] = 0xFF;
    terminator[1..6].copy_from_slice(b"CD001");

    root.write(root.lba, &mut image);
    image
}

/// Write `image` to `path` and return its length.
pub fn write_image(path: &Path, image: &[u8]) -> u64 {
    std::fs::write(path, image).unwrap();
    image.len() as u64
}

// -- HTTP --

/// Serve a single HTTP response on a loopback port. Returns the URL and the
/// server thread.
pub fn serve_once(status: &str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/GBC_V18_01.iso", listener.local_addr().unwrap());
    let status = status.to_string();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let header = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(header.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });
    (url, handle)
}
