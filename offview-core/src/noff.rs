/// NOFF text parser: vertices with normals, faces with optional colors
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::take_till1,
    character::complete::{
        i64 as parse_i64, line_ending, multispace0, multispace1, not_line_ending, space1,
        u32 as parse_u32,
    },
    combinator::opt,
    multi::{count, many_m_n},
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::{LoadError, LoadResult};
use crate::geometry::{Color, Face, Mesh, Vertex};

const MAGIC: &str = "NOFF";

/// Load a NOFF file from disk
pub fn load_noff<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = parse_noff(&text)?;
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse NOFF text into a mesh sized from its header
pub fn parse_noff(input: &str) -> LoadResult<Mesh> {
    let (input, magic) = parse_token(input).map_err(|e| parse_error("header", e))?;
    if magic != MAGIC {
        return Err(LoadError::NotNoff {
            found: magic.to_string(),
        });
    }

    let (mut input, (vertex_count, face_count)) =
        parse_counts(input).map_err(|e| parse_error("element counts", e))?;
    let mut mesh = Mesh::new(vertex_count as usize, face_count as usize)?;

    for i in 0..vertex_count {
        let (rest, vertex) =
            parse_vertex(input).map_err(|e| parse_error(&format!("vertex {i}"), e))?;
        mesh.append_vertex(vertex);
        input = rest;
    }

    for i in 0..face_count {
        if input.trim().is_empty() {
            log::warn!("header declares {face_count} faces but only {i} were found");
            break;
        }
        let (rest, face) = parse_face(input).map_err(|e| parse_error(&format!("face {i}"), e))?;
        mesh.append_face(face);
        input = rest;
    }

    if !input.trim().is_empty() {
        log::warn!("ignoring trailing data after {} faces", face_count);
    }

    Ok(mesh)
}

fn parse_error(what: &str, err: nom::Err<nom::error::Error<&str>>) -> LoadError {
    let message = match err {
        nom::Err::Incomplete(_) => format!("{what}: unexpected end of input"),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near: String = e.input.chars().take(24).collect();
            format!("{what}: expected {:?} near {:?}", e.code, near)
        }
    };
    LoadError::Parse { message }
}

fn parse_token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_till1(char::is_whitespace))(input)
}

/// Vertex and face counts. The edge count that follows is ignored.
fn parse_counts(input: &str) -> IResult<&str, (u32, u32)> {
    let (input, vertices) = preceded(multispace1, parse_u32)(input)?;
    let (input, faces) = preceded(multispace1, parse_u32)(input)?;
    let (input, _edges) = preceded(multispace1, parse_i64)(input)?;
    Ok((input, (vertices, faces)))
}

fn parse_vertex(input: &str) -> IResult<&str, Vertex> {
    let (input, values) = count(preceded(multispace0, float), 6)(input)?;
    let vertex = Vertex::new(values[0], values[1], values[2], values[3], values[4], values[5]);
    Ok((input, vertex))
}

/// `n i0 .. i(n-1)` followed by up to four color channels on the same line
fn parse_face(input: &str) -> IResult<&str, Face> {
    let (input, n) = preceded(multispace0, parse_u32)(input)?;
    let (input, indices) = count(preceded(multispace1, parse_u32), n as usize)(input)?;
    let (input, channels) = many_m_n(0, 4, preceded(space1, float))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, Face::new(indices, Color::from_channels(&channels))))
}
